// User-facing stdout text. Diagnostics go through `log` instead.
use std::io::Write;
use std::path::Path;

pub fn write_usage<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Usage: hexrecv <output_file>")?;
    writeln!(out, "Example: hexrecv 0000.vid")
}

pub fn write_prompt<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Paste the hex data from ESP32 (press Ctrl+D when done):")?;
    out.flush()
}

pub fn write_interrupted<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "\nInput terminated by user")
}

/// Reports a written file. `expected` is the size the device announced, when
/// it differs from `size`.
pub fn write_saved<W: Write>(
    out: &mut W,
    output_file: &Path,
    size: usize,
    expected: Option<usize>,
) -> std::io::Result<()> {
    writeln!(out, "\nFile saved as: {}", output_file.display())?;
    writeln!(out, "Size: {} bytes", size)?;
    if let Some(expected) = expected {
        writeln!(out, "Warning: expected {} bytes, received {}", expected, size)?;
    }
    Ok(())
}

pub fn write_error<W: Write>(out: &mut W, err: &anyhow::Error) -> std::io::Result<()> {
    writeln!(out, "Error: {:#}", err)
}
