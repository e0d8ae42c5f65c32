use embassy_futures::join::join;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::driver::{EndpointIn, EndpointOut};
use embassy_usb::msos::{self, windows_version};
use embassy_usb::{Builder, Config};

use ledmatrix_core::board::{USB_MANUFACTURER_STRING, USB_PRODUCT_FS_STRING};
use ledmatrix_core::protocol::{
    packets, respond, MessageAssembler, Response, MAX_MESSAGE_SIZE, REPLY_BUFFER_SIZE,
};

use crate::shared::constant::*;
use crate::shared::resource::{
    CHANNEL_SETTINGS_TO_STORAGE, CURRENT_SETTINGS, SIGNAL_SETTINGS_TO_RENDER,
};

/// Serve host commands on the vendor bulk endpoints
async fn command_loop<O: EndpointOut, I: EndpointIn>(read_ep: &mut O, write_ep: &mut I) -> ! {
    let mut assembler = MessageAssembler::<MAX_MESSAGE_SIZE>::new();
    let mut reply = [0u8; REPLY_BUFFER_SIZE];

    loop {
        read_ep.wait_enabled().await;
        defmt::info!("Connected");
        assembler.clear();

        loop {
            let mut packet = [0u8; USB_MAX_PACKET_SIZE as usize];
            let n = match read_ep.read(&mut packet).await {
                Ok(n) => n,
                Err(_) => break,
            };
            let Some(request) = assembler.push(&packet[..n], packet.len()) else {
                continue;
            };

            let (response, changed) = {
                let mut settings = CURRENT_SETTINGS.lock().await;
                let response = respond(request, &mut settings, &mut reply);
                let changed = matches!(response, Ok(Response { changed: true, .. }));
                (response, changed.then_some(*settings))
            };
            assembler.clear();

            if let Some(settings) = changed {
                defmt::info!("settings changed: {}", settings);
                SIGNAL_SETTINGS_TO_RENDER.signal(settings);
                CHANNEL_SETTINGS_TO_STORAGE.send(settings).await;
            }

            let len = match response {
                Ok(response) => response.len,
                Err(e) => {
                    defmt::error!("no reply: {}", e);
                    continue;
                }
            };
            for chunk in packets(&reply[..len], USB_MAX_PACKET_SIZE as usize) {
                if write_ep.write(chunk).await.is_err() {
                    defmt::warn!("reply dropped");
                    break;
                }
            }
        }
        defmt::info!("Disconnected");
    }
}

/// Device descriptor strings come from the board configuration
fn create_usb_config<'a>() -> Config<'a> {
    let mut config = Config::new(USB_VID, USB_PID);
    config.manufacturer = Some(USB_MANUFACTURER_STRING);
    config.product = Some(USB_PRODUCT_FS_STRING);
    config.serial_number = Some(USB_SERIAL_NUMBER);
    config.max_power = USB_MAX_POWER;
    config.max_packet_size_0 = USB_MAX_PACKET_SIZE as u8;
    config
}

#[embassy_executor::task]
pub async fn main_task(driver: Driver<'static, USB>) {
    let config = create_usb_config();

    let mut config_descriptor = [0; 256];
    let mut bos_descriptor = [0; 256];
    let mut msos_descriptor = [0; 256];
    let mut control_buf = [0; 64];

    let mut builder = Builder::new(
        driver,
        config,
        &mut config_descriptor,
        &mut bos_descriptor,
        &mut msos_descriptor,
        &mut control_buf,
    );

    // WinUSB binds without an INF, so libusb hosts can talk to the command interface
    builder.msos_descriptor(windows_version::WIN8_1, 0);
    builder.msos_feature(msos::CompatibleIdFeatureDescriptor::new("WINUSB", ""));
    builder.msos_feature(msos::RegistryPropertyFeatureDescriptor::new(
        "DeviceInterfaceGUIDs",
        msos::PropertyData::RegMultiSz(DEVICE_INTERFACE_GUIDS),
    ));

    // vendor class command interface
    let mut function = builder.function(0xFF, 0, 0);
    let mut interface = function.interface();
    let mut alt = interface.alt_setting(0xFF, 0, 0, None);
    let mut read_ep = alt.endpoint_bulk_out(USB_MAX_PACKET_SIZE);
    let mut write_ep = alt.endpoint_bulk_in(USB_MAX_PACKET_SIZE);
    drop(function);

    let mut usb = builder.build();

    join(usb.run(), command_loop(&mut read_ep, &mut write_ep)).await;
}
