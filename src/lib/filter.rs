// Line classification for the device's transfer output

/// Substrings the device prints around the hex payload. Any line containing
/// one of these is progress noise, never data.
pub const STATUS_MARKERS: [&str; 3] = ["Transferred:", "Transfer", "File size:"];

const FILE_SIZE_MARKER: &str = "File size:";

pub enum Line<'a> {
    Status(&'a str),
    Data(String),
}

pub fn is_status_line(line: &str) -> bool {
    STATUS_MARKERS.iter().any(|marker| line.contains(marker))
}

pub fn strip_non_hex(line: &str) -> String {
    line.chars().filter(|c| c.is_ascii_hexdigit()).collect()
}

pub fn classify(line: &str) -> Line<'_> {
    if is_status_line(line) {
        Line::Status(line)
    } else {
        Line::Data(strip_non_hex(line))
    }
}

/// Pulls `N` out of a `File size: N bytes` status line.
pub fn announced_size(line: &str) -> Option<usize> {
    let (_, rest) = line.split_once(FILE_SIZE_MARKER)?;
    rest.split_whitespace().next()?.parse::<usize>().ok()
}
