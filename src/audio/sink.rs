//! Building `rodio` sinks from fetched audio bytes.

use std::io::Cursor;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::error::EngineError;

/// Decode `bytes` and queue them on a new, paused `Sink`.
///
/// Returns the sink with the source's total length when the decoder knows it.
pub(super) fn create_paused_sink(
    stream: &OutputStream,
    address: &str,
    bytes: Vec<u8>,
    volume: f32,
) -> Result<(Sink, Option<Duration>), EngineError> {
    let byte_len = bytes.len() as u64;
    let mut builder = Decoder::builder()
        .with_data(Cursor::new(bytes))
        .with_byte_len(byte_len)
        .with_seekable(true);
    if let Some(hint) = extension_hint(address) {
        builder = builder.with_hint(&hint);
    }
    let source = builder.build().map_err(|e| EngineError::Decode {
        address: address.to_string(),
        source: e,
    })?;
    let duration = source.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    sink.pause();
    sink.set_volume(volume);
    sink.append(source);
    Ok((sink, duration))
}

/// Lowercased file extension of `address`, ignoring any query or fragment.
pub(super) fn extension_hint(address: &str) -> Option<String> {
    let path = address.split(['?', '#']).next().unwrap_or(address);
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Ramp `sink` down to silence over `fade_out_ms`.
pub(super) fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    let start = sink.volume();
    if fade_out_ms == 0 || sink.is_paused() || start <= 0.0 {
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(start * (1.0 - t));
        std::thread::sleep(Duration::from_millis(step_ms));
    }
}
