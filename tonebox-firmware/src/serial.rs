//! Line-oriented helpers for the command UART.

use embassy_rp::uart::{Async, Uart};
use tonebox::command::{BANNER, HELP_TEXT, LINE_END};

/// Transmit `text` followed by `\r\n`. Errors are logged and dropped.
pub async fn write_line(uart: &mut Uart<'_, Async>, text: &str) {
    if let Err(e) = uart.write(text.as_bytes()).await {
        defmt::warn!("UART write failed: {}", defmt::Debug2Format(&e));
        return;
    }
    if let Err(e) = uart.write(LINE_END).await {
        defmt::warn!("UART write failed: {}", defmt::Debug2Format(&e));
    }
}

/// Start-up banner followed by the command list.
pub async fn write_banner(uart: &mut Uart<'_, Async>) {
    for line in BANNER {
        write_line(uart, line).await;
    }
    write_help(uart).await;
}

pub async fn write_help(uart: &mut Uart<'_, Async>) {
    write_line(uart, HELP_TEXT).await;
}
