//! Filesystem-illegal character cleanup for filenames and subfolder segments.

use serde::{Deserialize, Serialize};

use crate::destination::{SEGMENT_SEPARATOR, WILDCARD_SEGMENT};

/// How illegal characters are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizePolicy {
    /// Drop illegal characters instead of substituting look-alikes.
    pub remove_illegal_chars: bool,
    /// Treat the Windows set (`<>:"/\|?*`) as illegal and strip trailing dots and spaces.
    pub windows_compatible: bool,
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        Self {
            remove_illegal_chars: false,
            windows_compatible: cfg!(windows),
        }
    }
}

const WINDOWS_ILLEGAL: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

fn lookalike(ch: char) -> Option<char> {
    Some(match ch {
        '*' => '★',
        '|' => '¦',
        '\\' => '⧹',
        '/' => '⁄',
        ':' => '։',
        '"' => '″',
        '>' => '›',
        '<' => '‹',
        '?' => '﹖',
        _ => return None,
    })
}

impl SanitizePolicy {
    fn is_illegal(&self, ch: char) -> bool {
        if self.windows_compatible {
            WINDOWS_ILLEGAL.contains(&ch)
        } else {
            ch == '/'
        }
    }

    /// Clean one path component: control characters and internal markers are
    /// always removed, illegal characters are removed or replaced.
    pub fn sanitize_component(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            if ch.is_control() || ch == SEGMENT_SEPARATOR || ch == WILDCARD_SEGMENT {
                continue;
            }
            if !self.is_illegal(ch) {
                out.push(ch);
            } else if !self.remove_illegal_chars {
                if let Some(replacement) = lookalike(ch) {
                    out.push(replacement);
                }
            }
        }
        if self.windows_compatible {
            let kept = out.trim_end_matches(['.', ' ']).len();
            out.truncate(kept);
        }
        out
    }
}
