use embassy_futures::join::{join, join4};
use embassy_rp::peripherals::{PIO0, PIO1};
use embassy_rp::pio::Common;

use ledmatrix_core::board::LEDS_PER_STRIP;
use ledmatrix_core::matrix::LedMatrix;

use super::ws2812::Ws2812;

type Strip0<'d, const SM: usize> = Ws2812<'d, PIO0, SM, LEDS_PER_STRIP>;
type Strip1<'d, const SM: usize> = Ws2812<'d, PIO1, SM, LEDS_PER_STRIP>;

/// All eight strips of the matrix. Strips 0..3 run on PIO0, 4..7 on PIO1.
pub struct LedStrips<'d> {
    /// kept alive with the loaded programs
    _pio0: Common<'d, PIO0>,
    _pio1: Common<'d, PIO1>,
    s0: Strip0<'d, 0>,
    s1: Strip0<'d, 1>,
    s2: Strip0<'d, 2>,
    s3: Strip0<'d, 3>,
    s4: Strip1<'d, 0>,
    s5: Strip1<'d, 1>,
    s6: Strip1<'d, 2>,
    s7: Strip1<'d, 3>,
}

impl<'d> LedStrips<'d> {
    pub fn new(
        pio0: Common<'d, PIO0>,
        pio1: Common<'d, PIO1>,
        (s0, s1, s2, s3): (Strip0<'d, 0>, Strip0<'d, 1>, Strip0<'d, 2>, Strip0<'d, 3>),
        (s4, s5, s6, s7): (Strip1<'d, 0>, Strip1<'d, 1>, Strip1<'d, 2>, Strip1<'d, 3>),
    ) -> Self {
        Self {
            _pio0: pio0,
            _pio1: pio1,
            s0,
            s1,
            s2,
            s3,
            s4,
            s5,
            s6,
            s7,
        }
    }

    /// Push a frame to all strips at once
    pub async fn write(&mut self, matrix: &LedMatrix) {
        let [c0, c1, c2, c3, c4, c5, c6, c7] = matrix.as_strips();
        join(
            join4(
                self.s0.write(c0),
                self.s1.write(c1),
                self.s2.write(c2),
                self.s3.write(c3),
            ),
            join4(
                self.s4.write(c4),
                self.s5.write(c5),
                self.s6.write(c6),
                self.s7.write(c7),
            ),
        )
        .await;
    }
}

/// Strip n is wired to GPIO (15 - n), see `ledmatrix_core::board::strip_gpio`
#[macro_export]
macro_rules! init_led_strips {
    ($p:ident, $irqs:expr) => {{
        use embassy_rp::pio::Pio;
        use $crate::led::strips::LedStrips;
        use $crate::led::ws2812::{Ws2812, Ws2812Program};

        let Pio {
            common: mut pio0,
            sm0,
            sm1,
            sm2,
            sm3,
            ..
        } = Pio::new($p.PIO0, $irqs);
        let program = Ws2812Program::new(&mut pio0);
        let low = (
            Ws2812::new(&mut pio0, sm0, $p.DMA_CH0, $p.PIN_15, &program),
            Ws2812::new(&mut pio0, sm1, $p.DMA_CH1, $p.PIN_14, &program),
            Ws2812::new(&mut pio0, sm2, $p.DMA_CH2, $p.PIN_13, &program),
            Ws2812::new(&mut pio0, sm3, $p.DMA_CH3, $p.PIN_12, &program),
        );

        let Pio {
            common: mut pio1,
            sm0,
            sm1,
            sm2,
            sm3,
            ..
        } = Pio::new($p.PIO1, $irqs);
        let program = Ws2812Program::new(&mut pio1);
        let high = (
            Ws2812::new(&mut pio1, sm0, $p.DMA_CH4, $p.PIN_11, &program),
            Ws2812::new(&mut pio1, sm1, $p.DMA_CH5, $p.PIN_10, &program),
            Ws2812::new(&mut pio1, sm2, $p.DMA_CH6, $p.PIN_9, &program),
            Ws2812::new(&mut pio1, sm3, $p.DMA_CH7, $p.PIN_8, &program),
        );

        LedStrips::new(pio0, pio1, low, high)
    }};
}
