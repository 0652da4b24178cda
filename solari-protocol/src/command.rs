//! Console commands

/// A parsed console command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Re-run the homing sequence
    Home,
    /// Rotate until the given symbol is showing
    Show(char),
    /// Report the current slot and whether it can be trusted
    Status,
    /// Take one debounced hall sensor reading
    Hall,
    /// Unrecognized input
    Invalid,
}

impl Command {
    /// Parse a command from one input line
    ///
    /// Surrounding whitespace is ignored and keywords are case-insensitive.
    /// Returns `None` for a blank line, which must not produce a reply.
    pub fn parse(line: &str) -> Option<Self> {
        let token = line.trim();
        if token.is_empty() {
            return None;
        }

        let mut chars = token.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(if c.is_ascii_graphic() {
                Command::Show(c)
            } else {
                Command::Invalid
            });
        }

        let cmd = if token.eq_ignore_ascii_case("HOME") {
            Command::Home
        } else if token.eq_ignore_ascii_case("STATUS") {
            Command::Status
        } else if token.eq_ignore_ascii_case("HALL") {
            Command::Hall
        } else {
            Command::Invalid
        };
        Some(cmd)
    }
}
