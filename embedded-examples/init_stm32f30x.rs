//! Full example code for driving a 128x64 SSD1322 panel. This runs on an STM32F303RE, with the
//! display connected to SPI1, PA8 for D/C, PA9 for /RESET and PA10 for C/S. It shows a centered
//! greeting, then scrolls a long line along the bottom of the panel forever.

#![deny(unsafe_code)]
#![no_main]
#![no_std]

extern crate cortex_m;
extern crate embedded_hal as hal_api;
extern crate stm32f30x;
extern crate stm32f30x_hal as hal;
#[macro_use]
extern crate cortex_m_rt;
extern crate panic_abort;
extern crate ssd1322_gray;

use cortex_m::asm;
use cortex_m_rt::ExceptionFrame;
use hal::prelude::*;
use hal::spi;
use ssd1322_gray as oled;

entry!(main);

exception!(*, default_handler);
exception!(HardFault, hard_fault);

fn hard_fault(_ef: &ExceptionFrame) -> ! {
    asm::bkpt();
    loop {}
}

fn default_handler(_irqn: i16) {
    loop {}
}

fn main() -> ! {
    // Get peripherals and set up RCC.
    let cp = cortex_m::Peripherals::take().unwrap();
    let dp = stm32f30x::Peripherals::take().unwrap();

    let mut flash = dp.FLASH.constrain();
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze(&mut flash.acr);
    let delay = hal::delay::Delay::new(cp.SYST, clocks);

    // Get GPIO A where the display is connected.
    let mut gpioa = dp.GPIOA.split(&mut rcc.ahb);

    // Set up SPI1, which is Alternate Function 5 for GPIOs PA5,6,7.
    let disp_sck = gpioa.pa5.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let disp_miso = gpioa.pa6.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let disp_mosi = gpioa.pa7.into_af5(&mut gpioa.moder, &mut gpioa.afrl);

    let disp_spi = spi::Spi::spi1(
        dp.SPI1,
        (disp_sck, disp_miso, disp_mosi),
        hal_api::spi::Mode {
            polarity: hal_api::spi::Polarity::IdleLow,
            phase: hal_api::spi::Phase::CaptureOnFirstTransition,
        },
        8.mhz(),
        clocks,
        &mut rcc.apb2,
    );

    // PA8 will be the D/C push-pull output for the 4th wire.
    let disp_dc = gpioa
        .pa8
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);

    // PA9 is the display's /RESET pin, pulsed by `Display::init`.
    let disp_rst = gpioa
        .pa9
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);

    // PA10 is the active-low chip select.
    let disp_cs = gpioa
        .pa10
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);

    let mut disp = oled::Display::new(
        oled::SpiInterface::new(disp_spi, disp_dc, disp_cs),
        disp_rst,
        delay,
        oled::Config::default(),
    );

    // Any failure here leaves the controller in an unknown state, so give up.
    disp.init().unwrap();
    disp.draw_string_centered("Hello, SSD1322").unwrap();
    asm::delay(72_000_000);

    let mut line = oled::ScrollLine::new("A line too long to fit on the panel at once", 56);
    disp.clear_framebuffer();
    disp.framebuffer_mut().draw_line_centered("ticker", 20);
    loop {
        line.tick(disp.framebuffer_mut());
        // A refresh moves 64 rows of 256 bytes, so pace the ticks well below that.
        if disp.refresh().is_err() {
            asm::bkpt();
        }
        asm::delay(2_000_000);
    }
}
