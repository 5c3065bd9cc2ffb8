#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;

#[rtic::app(device = rp_pico::hal::pac, peripherals = true, dispatchers = [PIO0_IRQ_0])]
mod app {
    use rp_pico as bsp;

    use bsp::hal;
    use defmt::Debug2Format;
    use fugit::{ExtU64, RateExtU32};
    use hal::clocks::init_clocks_and_plls;
    use hal::gpio::{bank0::*, FunctionSioOutput, FunctionUart, Pin, PullDown};
    use hal::uart::{DataBits, Enabled, StopBits, UartConfig, UartPeripheral};
    use hal::usb::UsbBus as Rp2040Usb;
    use hal::Clock;
    use rp2040_monotonic::Rp2040Monotonic;
    use rtic::mutex_prelude::*;

    use usb_device::class_prelude::*;
    use usb_device::prelude::*;
    use usbd_human_interface_device::device::consumer::{
        ConsumerControl, ConsumerControlConfig, MultipleConsumerReport,
    };
    use usbd_human_interface_device::device::keyboard::{NKROBootKeyboard, NKROBootKeyboardConfig};
    use usbd_human_interface_device::device::mouse::{WheelMouse, WheelMouseConfig, WheelMouseReport};
    use usbd_human_interface_device::page::Consumer;
    use usbd_human_interface_device::prelude::*;

    use mitosis_keymap::keymap::{keymap, KeymapT, SIZE};
    use mitosis_keymap::keystate::{Media, Report, MEDIA_ROLLOVER};
    use mitosis_keymap::led::RgbLed;
    use mitosis_keymap::link::{decode, FrameError, FrameReader, FRAME_LEN, REQUEST};
    use mitosis_keymap::mouse::{MouseQueue, MouseReport};

    const ROLLOVER: usize = 24;
    const SCAN_PERIOD_MS: u64 = 1;
    /// The receiver answers well within this at 1 Mbaud
    const RECEIVER_TIMEOUT_MS: u64 = 5;

    type HidDevices<'a> = frunk::HCons<
        ConsumerControl<'a, Rp2040Usb>,
        frunk::HCons<
            WheelMouse<'a, Rp2040Usb>,
            frunk::HCons<NKROBootKeyboard<'a, Rp2040Usb>, frunk::HNil>,
        >,
    >;
    type Hid = UsbHidClass<'static, Rp2040Usb, HidDevices<'static>>;

    type Receiver = UartPeripheral<
        Enabled,
        hal::pac::UART0,
        (
            Pin<Gpio0, FunctionUart, PullDown>,
            Pin<Gpio1, FunctionUart, PullDown>,
        ),
    >;

    type Led = RgbLed<
        Pin<Gpio13, FunctionSioOutput, PullDown>,
        Pin<Gpio14, FunctionSioOutput, PullDown>,
        Pin<Gpio15, FunctionSioOutput, PullDown>,
    >;

    #[monotonic(binds = TIMER_IRQ_0, default = true)]
    type Mono = Rp2040Monotonic;

    #[shared]
    struct Shared {
        hid: Hid,
        usb_device: UsbDevice<'static, Rp2040Usb>,
    }

    #[local]
    struct Local {
        keymap: KeymapT,
        report: Report<ROLLOVER>,
        mouse: MouseQueue,
        keys: [bool; SIZE],
        receiver: Receiver,
        reader: FrameReader,
        requested_at: Option<u64>,
        led: Led,
    }

    fn now_ms() -> u64 {
        monotonics::now().ticks() / 1_000
    }

    #[init(local = [usb_alloc: Option<UsbBusAllocator<Rp2040Usb>> = None])]
    fn init(cx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut pac = cx.device;
        let mut watchdog = hal::watchdog::Watchdog::new(pac.WATCHDOG);
        let Ok(clocks) = init_clocks_and_plls(
            bsp::XOSC_CRYSTAL_FREQ,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        ) else {
            defmt::panic!("Failed to start clocks");
        };

        let sio = hal::Sio::new(pac.SIO);
        let pins = bsp::Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        let mono = Rp2040Monotonic::new(pac.TIMER);

        let uart_pins = (
            pins.gpio0.into_function::<FunctionUart>(),
            pins.gpio1.into_function::<FunctionUart>(),
        );
        let receiver = match UartPeripheral::new(pac.UART0, uart_pins, &mut pac.RESETS).enable(
            UartConfig::new(1_000_000.Hz(), DataBits::Eight, None, StopBits::One),
            clocks.peripheral_clock.freq(),
        ) {
            Ok(uart) => uart,
            Err(_) => defmt::panic!("Failed to set up receiver UART"),
        };

        let led = RgbLed::new(
            pins.gpio13.into_push_pull_output(),
            pins.gpio14.into_push_pull_output(),
            pins.gpio15.into_push_pull_output(),
        );

        let usb_alloc = cx.local.usb_alloc.insert(UsbBusAllocator::new(Rp2040Usb::new(
            pac.USBCTRL_REGS,
            pac.USBCTRL_DPRAM,
            clocks.usb_clock,
            true,
            &mut pac.RESETS,
        )));

        let hid = UsbHidClassBuilder::new()
            .add_device(NKROBootKeyboardConfig::default())
            .add_device(WheelMouseConfig::default())
            .add_device(ConsumerControlConfig::default())
            .build(usb_alloc);

        // https://pid.codes
        let usb_device = UsbDeviceBuilder::new(usb_alloc, UsbVidPid(0x1209, 0x0001))
            .manufacturer("binarycode")
            .product("Mitosis")
            .serial_number(env!("CARGO_PKG_VERSION"))
            .build();

        scan::spawn().ok();
        defmt::info!("Mitosis up");

        (
            Shared { hid, usb_device },
            Local {
                keymap: keymap(),
                report: Default::default(),
                mouse: MouseQueue::new(),
                keys: [false; SIZE],
                receiver,
                reader: FrameReader::new(),
                requested_at: None,
                led,
            },
            init::Monotonics(mono),
        )
    }

    /// Poll the receiver, run the keymap and send the reports
    #[task(local = [keymap, report, mouse, keys, receiver, reader, requested_at, led], shared = [hid])]
    fn scan(mut cx: scan::Context) {
        let now = now_ms();
        let local = cx.local;

        match poll_receiver(local.receiver, local.reader, local.requested_at, now) {
            Ok(Some(frame)) => {
                if let Err(e) = decode(&frame, local.keys) {
                    defmt::warn!("Dropped frame: {}", e);
                }
            }
            Ok(None) => (),
            Err(e) => defmt::warn!("Receiver: {}", e),
        }

        local.report.clear();
        local.keymap.process(local.keys, local.report, now);
        if core::mem::take(&mut local.keymap.flags.rollover) {
            defmt::warn!("Rollover, dropped keys");
        }

        if local.led.show_layer(local.keymap.active_layer()).is_err() {
            defmt::warn!("Failed to set LED");
        }

        local.mouse.add(&local.report.mouse);
        cx.shared
            .hid
            .lock(|hid| write_reports(hid, local.report, local.mouse));

        if scan::spawn_after(SCAN_PERIOD_MS.millis()).is_err() {
            defmt::error!("Failed to reschedule scan");
        }
    }

    /// Collect the answer to the last request, asking again once it is in or has timed out
    fn poll_receiver(
        receiver: &mut Receiver,
        reader: &mut FrameReader,
        requested_at: &mut Option<u64>,
        now: u64,
    ) -> Result<Option<[u8; FRAME_LEN]>, FrameError> {
        let mut frame = None;
        let mut buf = [0; 1];
        while frame.is_none() && receiver.uart_is_readable() {
            if let Ok(bytes) = receiver.read_raw(&mut buf) {
                for byte in bytes.iter() {
                    frame = reader.push(*byte);
                }
            }
        }

        let timed_out = match *requested_at {
            Some(at) => frame.is_none() && now >= at + RECEIVER_TIMEOUT_MS,
            None => false,
        };
        if frame.is_some() || timed_out || requested_at.is_none() {
            reader.reset();
            receiver.write_full_blocking(&[REQUEST]);
            *requested_at = Some(now);
        }

        if timed_out {
            Err(FrameError::Timeout)
        } else {
            Ok(frame)
        }
    }

    fn write_reports(hid: &mut Hid, report: &Report<ROLLOVER>, mouse: &mut MouseQueue) {
        let keys = report.keys.iter().copied();
        match hid.device::<NKROBootKeyboard<'_, _>, _>().write_report(keys) {
            Err(UsbHidError::WouldBlock) | Err(UsbHidError::Duplicate) | Ok(_) => {}
            Err(e) => defmt::warn!("Failed to write keyboard report: {}", Debug2Format(&e)),
        }

        if let Some(next) = mouse.next() {
            match hid
                .device::<WheelMouse<'_, _>, _>()
                .write_report(&mouse_report(&next))
            {
                // Still holding the last report, try again next scan
                Err(UsbHidError::WouldBlock) => {}
                Err(UsbHidError::Duplicate) | Ok(_) => mouse.sent(),
                Err(e) => defmt::warn!("Failed to write mouse report: {}", Debug2Format(&e)),
            }
        }

        match hid
            .device::<ConsumerControl<'_, _>, _>()
            .write_report(&consumer_report(&report.media))
        {
            Err(UsbError::WouldBlock) | Ok(_) => {}
            Err(e) => defmt::warn!("Failed to write consumer report: {}", Debug2Format(&e)),
        }

        match hid.tick() {
            Err(UsbHidError::WouldBlock) | Ok(_) => {}
            Err(e) => defmt::warn!("Failed to process keyboard tick: {}", Debug2Format(&e)),
        }
    }

    fn mouse_report(mouse: &MouseReport) -> WheelMouseReport {
        WheelMouseReport {
            buttons: mouse.buttons,
            x: mouse.x,
            y: mouse.y,
            vertical_wheel: mouse.wheel,
            horizontal_wheel: mouse.pan,
        }
    }

    fn consumer_report(media: &heapless::Vec<Media, MEDIA_ROLLOVER>) -> MultipleConsumerReport {
        let mut codes = [Consumer::Unassigned; 4];
        for (code, key) in codes.iter_mut().zip(media) {
            *code = match key {
                Media::PrevTrack => Consumer::ScanPreviousTrack,
                Media::PlayPause => Consumer::PlayPause,
                Media::Stop => Consumer::Stop,
                Media::NextTrack => Consumer::ScanNextTrack,
                Media::VolumeUp => Consumer::VolumeIncrement,
                Media::VolumeDown => Consumer::VolumeDecrement,
            };
        }
        MultipleConsumerReport { codes }
    }

    #[task(binds = USBCTRL_IRQ, shared = [hid, usb_device])]
    fn usb_irq(cx: usb_irq::Context) {
        (cx.shared.hid, cx.shared.usb_device).lock(|hid, usb_device| {
            if usb_device.poll(&mut [hid]) {
                match hid.device::<NKROBootKeyboard<'_, _>, _>().read_report() {
                    Err(UsbError::WouldBlock) => {}
                    Err(e) => defmt::warn!("Failed to read keyboard report: {}", Debug2Format(&e)),
                    Ok(leds) => defmt::trace!("Host LEDs {}", leds.caps_lock),
                }
            }
        });
    }
}
