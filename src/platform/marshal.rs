//=========================================================================
// Handle Marshaller
//
// Converts caller strings (window title, icon path) into the
// null-terminated byte buffers native window libraries expect.
//
// Notes:
// Encoding is plain UTF-8 followed by exactly one zero byte. Nothing is
// escaped; a string containing an interior zero is truncated there by
// whatever reads it on the native side.
//=========================================================================

use std::ffi::c_char;
use std::fmt;
use std::path::Path;
use std::str::Utf8Error;

//=== NativeString ========================================================

/// UTF-8 text with a single trailing zero byte, ready to cross FFI.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct NativeString {
    bytes: Vec<u8>,
}

impl NativeString {
    /// Encodes `text` and appends the terminator.
    pub fn new(text: &str) -> Self {
        let mut bytes = Vec::with_capacity(text.len() + 1);
        bytes.extend_from_slice(text.as_bytes());
        bytes.push(0);
        Self { bytes }
    }

    /// Full buffer including the terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes
    }

    /// Buffer without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() - 1]
    }

    /// Decodes the buffer back into text, dropping the terminator.
    pub fn to_str(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(self.as_bytes())
    }

    /// Pointer handed to native code. Valid while `self` is alive.
    pub fn as_ptr(&self) -> *const c_char {
        self.bytes.as_ptr().cast()
    }
}

impl From<&str> for NativeString {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<&Path> for NativeString {
    fn from(path: &Path) -> Self {
        Self::new(&path.to_string_lossy())
    }
}

impl fmt::Debug for NativeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeString({:?})", String::from_utf8_lossy(self.as_bytes()))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
