use embassy_futures::select::{select, Either};
use embassy_rp::clocks::RoscRng;
use embassy_time::Timer;

use ledmatrix_core::effect::EffectRunner;
use ledmatrix_core::matrix::LedMatrix;

use crate::led::strips::LedStrips;
use crate::shared::resource::SIGNAL_SETTINGS_TO_RENDER;

#[embassy_executor::task]
pub async fn main_task(mut strips: LedStrips<'static>) {
    let mut rng = RoscRng;
    let mut matrix = LedMatrix::new();

    let settings = SIGNAL_SETTINGS_TO_RENDER.wait().await;
    defmt::info!("render start: {}", settings);
    let mut effect = EffectRunner::new(&settings);

    loop {
        let delay_ms = effect.step(&mut matrix, &mut rng);
        strips.write(&matrix).await;

        let frame_timer = Timer::after_millis(delay_ms.into());
        if let Either::Second(settings) = select(frame_timer, SIGNAL_SETTINGS_TO_RENDER.wait()).await {
            if effect.configure(&settings) {
                defmt::info!("effect changed: {}", settings.effect);
                matrix.clear();
            }
        }
    }
}
