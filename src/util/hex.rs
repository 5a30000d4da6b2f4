//! Hex formatting utilities.
//!
//! Compact hex strings for field values, the `first...last` elision used for
//! long values, byte-range labels, and a traditional hex dump with offset
//! column and ASCII sidebar for raw node bytes.

use std::borrow::Cow;

/// Format bytes as a compact lowercase hex string (e.g., "4a2f00ff").
pub fn format_bytes(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Shorten `text` to `keep` leading and `keep` trailing characters joined by
/// `...` once it is longer than `threshold` characters.
///
/// Text that would not get shorter is returned unchanged. Expects ASCII
/// input such as the output of [`format_bytes`].
pub fn elide(text: &str, threshold: usize, keep: usize) -> Cow<'_, str> {
    if text.len() <= threshold || text.len() <= 2 * keep || !text.is_ascii() {
        return Cow::Borrowed(text);
    }
    Cow::Owned(format!("{}...{}", &text[..keep], &text[text.len() - keep..]))
}

/// Format a byte range as "start..end (0xstart..0xend)".
pub fn format_range(offset: u64, length: u64) -> String {
    let end = offset.saturating_add(length);
    format!("{}..{} (0x{:x}..0x{:x})", offset, end, offset, end)
}

/// Produce a standard hex dump of `data` with the given `base_offset`.
///
/// Output format (16 bytes per line):
/// ```text
/// 00000000  xx xx xx xx xx xx xx xx  xx xx xx xx xx xx xx xx  |................|
/// ```
pub fn hex_dump(data: &[u8], base_offset: u64) -> String {
    let mut lines = Vec::new();

    for (i, chunk) in data.chunks(16).enumerate() {
        let offset = base_offset + (i * 16) as u64;

        let mut line = format!("{:08x}  ", offset);

        // Two groups of 8 bytes separated by an extra space
        for (j, byte) in chunk.iter().enumerate() {
            if j == 8 {
                line.push(' ');
            }
            line.push_str(&format!("{:02x} ", byte));
        }

        // Pad short last line
        for j in chunk.len()..16 {
            if j == 8 {
                line.push(' ');
            }
            line.push_str("   ");
        }

        line.push(' ');
        line.push('|');
        for byte in chunk {
            if byte.is_ascii_graphic() || *byte == b' ' {
                line.push(*byte as char);
            } else {
                line.push('.');
            }
        }
        for _ in chunk.len()..16 {
            line.push(' ');
        }
        line.push('|');

        lines.push(line);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(&[0x55, 0xaa]), "55aa");
        assert_eq!(format_bytes(&[]), "");
    }

    #[test]
    fn test_elide() {
        let text = "000102030405060708090a0b0c0d0e0f";
        assert_eq!(elide(text, 20, 6), "000102...0d0e0f");
        assert_eq!(elide("deadbeef", 20, 6), "deadbeef");
        assert_eq!(elide("0123456789ab", 4, 6), "0123456789ab");
        assert!(matches!(elide("deadbeef", 20, 6), Cow::Borrowed(_)));
    }

    #[test]
    fn test_format_range() {
        assert_eq!(format_range(446, 16), "446..462 (0x1be..0x1ce)");
    }

    #[test]
    fn test_hex_dump_signature_line() {
        let mut data = vec![0u8; 16];
        data[14] = 0x55;
        data[15] = 0xaa;
        let output = hex_dump(&data, 0x1f0);
        assert!(output.starts_with("000001f0  "));
        assert!(output.contains("00 00 00 00 00 00 55 aa"));
        assert!(output.ends_with("|................|"));
    }

    #[test]
    fn test_hex_dump_partial_line() {
        let output = hex_dump(b"ext2", 0);
        assert!(output.contains("65 78 74 32"));
        assert!(output.contains("|ext2            |"));
        assert_eq!(output.lines().count(), 1);
    }
}
