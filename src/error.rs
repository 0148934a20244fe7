use snafu::Snafu;

/// The public Error type for this crate.
#[derive(Debug, Snafu)]
pub struct Error(LibError);

/// The public Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The internal Result type for this crate.
pub(crate) type LibResult<T> = std::result::Result<T, LibError>;

/// The internal Error type for this crate. Never exposed directly; callers only ever see the
/// opaque [`Error`] wrapper above, which keeps this enum free to grow new variants.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub(crate) enum LibError {
    #[snafu(display("{}: input too short: needed at least {} bytes, got {}", site, needed, got))]
    InputTooShort {
        site: String,
        needed: usize,
        got: usize,
    },

    #[snafu(display("{}: unexpected size: got {}, expected {}", site, got, expected))]
    UnexpectedSize {
        site: String,
        got: usize,
        expected: String,
    },

    #[snafu(display("{}: bad magic: expected {:?}, found {:?}", site, expected, found))]
    BadMagic {
        site: String,
        expected: &'static str,
        found: String,
    },

    #[snafu(display("{}: bad manufacturer byte: {:#04x}", site, got))]
    BadManufacturer { site: String, got: u8 },

    #[snafu(display("{}: bad model byte: {:#04x}", site, got))]
    BadModel { site: String, got: u8 },

    #[snafu(display(
        "{}: bad checksum at offset {}: computed {:#04x}, found {:#04x}",
        site,
        offset,
        want,
        got
    ))]
    BadChecksum {
        site: String,
        offset: usize,
        got: u8,
        want: u8,
    },

    #[snafu(display("{}: tempo out of range: raw value {}", site, raw))]
    TempoOutOfRange { site: String, raw: i64 },

    #[snafu(display("{}: region out of bounds: {}", site, name))]
    RegionOutOfBounds { site: String, name: &'static str },

    #[snafu(display("{}: {}", site, description))]
    InvalidFile { site: String, description: String },

    #[snafu(display("{} unknown error", site))]
    Other { site: String },
}

/// Captures `file!():line!()` at the call site, matching the diagnostic convention used
/// throughout this crate's error construction.
macro_rules! site {
    () => {
        format!("{}:{}", file!(), line!())
    };
}

macro_rules! invalid_file_e {
    ($msg:expr) => {
        crate::error::InvalidFile {
            site: site!(),
            description: $msg,
        }
        .build()
    };
    ($fmt:expr, $($arg:expr),+) => {
        crate::error::InvalidFile {
            site: site!(),
            description: format!($fmt, $($arg),+),
        }
        .build()
    };
}

macro_rules! invalid_file {
    ($msg:expr) => {
        return Err(invalid_file_e!($msg))
    };
    ($fmt:expr, $($arg:expr),+) => {
        return Err(invalid_file_e!($fmt, $($arg),+))
    };
}

#[test]
fn site_test() {
    let line = line!() + 1;
    let site = site!();
    assert!(site.contains("error.rs"));
    assert!(site.contains(format!("{}", line).as_str()));
}

#[test]
fn invalid_file_macro_test() {
    fn foo() -> LibResult<u64> {
        invalid_file!("flerbin");
    }
    let result = foo();
    assert!(result.is_err());
    let message = format!("{}", result.err().unwrap());
    assert!(message.contains("flerbin"));
}
