use embassy_rp::clocks;
use embassy_rp::dma::{AnyChannel, Channel};
use embassy_rp::pio::{
    Common, Config, Direction, FifoJoin, Instance, LoadedProgram, PioPin, ShiftConfig,
    ShiftDirection, StateMachine,
};
use embassy_rp::{into_ref, Peripheral, PeripheralRef};
use embassy_time::Timer;
use fixed::types::U24F8;
use smart_leds::RGB8;

use ledmatrix_core::color::grb_word;

use crate::shared::constant::{WS2812_BIT_FREQ_KHZ, WS2812_LATCH_US};

/// PIO cycles per bit: stop (3) + start (2) + data (5)
const CYCLES_PER_BIT: u32 = 10;

/// WS2812 bit banging program, loaded once per PIO block and shared by its state machines
pub struct Ws2812Program<'d, PIO: Instance> {
    prg: LoadedProgram<'d, PIO>,
}

impl<'d, PIO: Instance> Ws2812Program<'d, PIO> {
    pub fn new(common: &mut Common<'d, PIO>) -> Self {
        let prg = pio_proc::pio_asm!(
            ".side_set 1",
            ".wrap_target",
            "bitloop:",
            "    out x, 1       side 0 [2]",
            "    jmp !x do_zero side 1 [1]",
            "    jmp bitloop    side 1 [4]",
            "do_zero:",
            "    nop            side 0 [4]",
            ".wrap",
        );
        let prg = common.load_program(&prg.program);
        Self { prg }
    }
}

/// One WS2812 strip on a PIO state machine, fed by DMA
pub struct Ws2812<'d, PIO: Instance, const SM: usize, const N: usize> {
    dma: PeripheralRef<'d, AnyChannel>,
    sm: StateMachine<'d, PIO, SM>,
}

impl<'d, PIO: Instance, const SM: usize, const N: usize> Ws2812<'d, PIO, SM, N> {
    pub fn new(
        common: &mut Common<'d, PIO>,
        mut sm: StateMachine<'d, PIO, SM>,
        dma: impl Peripheral<P = impl Channel> + 'd,
        pin: impl Peripheral<P = impl PioPin + 'd> + 'd,
        program: &Ws2812Program<'d, PIO>,
    ) -> Self {
        into_ref!(dma);

        let out_pin = common.make_pio_pin(pin);
        let mut cfg = Config::default();
        cfg.use_program(&program.prg, &[&out_pin]);

        // kHz to stay inside U24F8
        let clock_freq = U24F8::from_num(clocks::clk_sys_freq() / 1000);
        let bit_freq = U24F8::from_num(WS2812_BIT_FREQ_KHZ) * CYCLES_PER_BIT;
        cfg.clock_divider = clock_freq / bit_freq;

        cfg.fifo_join = FifoJoin::TxOnly;
        cfg.shift_out = ShiftConfig {
            auto_fill: true,
            threshold: 24,
            direction: ShiftDirection::Left,
        };

        sm.set_config(&cfg);
        sm.set_pin_dirs(Direction::Out, &[&out_pin]);
        sm.set_enable(true);

        Self {
            dma: dma.map_into(),
            sm,
        }
    }

    /// Shift out one frame and wait for the latch
    pub async fn write(&mut self, colors: &[RGB8; N]) {
        let mut words = [0u32; N];
        for (word, color) in words.iter_mut().zip(colors.iter()) {
            *word = grb_word(*color);
        }

        self.sm.tx().dma_push(self.dma.reborrow(), &words).await;

        Timer::after_micros(WS2812_LATCH_US).await;
    }
}
