//! Source location of a logging call
//!
//! A [`Caller`] is resolved once per emitted record. Plain method calls get the
//! file and line through `#[track_caller]`; the logging macros also capture the
//! enclosing function through [`function_name!`](crate::function_name).

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

/// Rendering variants of a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallerStyle {
    /// `file(line)`
    #[default]
    Short,
    /// `package/file(line)` with the package path `/`-separated, or the full
    /// file path when the package is unknown
    Long,
    /// `function(line)`
    Function,
    /// `package::function(line)`
    QualifiedFunction,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Caller {
    file: Cow<'static, str>,
    line: Option<u32>,
    function: Cow<'static, str>,
}

impl Caller {
    /// Build a caller from explicit parts. `function` is the qualified name,
    /// e.g. `my_crate::net::connect`.
    pub fn new(
        file: impl Into<Cow<'static, str>>,
        line: u32,
        function: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            file: file.into(),
            line: Some(line),
            function: function.into(),
        }
    }

    /// Location of the application code that called into the logger.
    ///
    /// Every public logging entry point is `#[track_caller]`, so the location
    /// propagates through them and lands on the first frame outside the crate.
    #[track_caller]
    pub fn resolve() -> Self {
        let location = Location::caller();
        Self {
            file: Cow::Borrowed(location.file()),
            line: Some(location.line()),
            function: Cow::Borrowed(""),
        }
    }

    /// Sentinel for "no location available": empty file, line -1.
    pub const fn unknown() -> Self {
        Self {
            file: Cow::Borrowed(""),
            line: None,
            function: Cow::Borrowed(""),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.file.is_empty() && self.line.is_none()
    }

    /// File path as recorded by the compiler, e.g. `src/net/peer.rs`.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Last component of [`file`](Self::file).
    pub fn file_name(&self) -> &str {
        self.file
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or("")
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }

    /// Key used by the code writer to look up per-file levels.
    pub fn file_key(&self) -> &str {
        &self.file
    }

    pub fn qualified_function(&self) -> &str {
        &self.function
    }

    /// Everything before the last `::` of the qualified function name.
    pub fn package(&self) -> &str {
        match self.function.rfind("::") {
            Some(i) => &self.function[..i],
            None => "",
        }
    }

    /// Everything after the last `::` of the qualified function name.
    pub fn function(&self) -> &str {
        match self.function.rfind("::") {
            Some(i) => &self.function[i + 2..],
            None => &self.function,
        }
    }

    pub fn display(&self, style: CallerStyle) -> CallerDisplay<'_> {
        CallerDisplay {
            caller: self,
            style,
        }
    }

    fn render(&self, style: CallerStyle, precision: Option<usize>) -> String {
        let line = match (self.line, precision) {
            (Some(line), Some(p)) => format!("{:>p$}", line, p = p),
            (Some(line), None) => line.to_string(),
            (None, Some(p)) => format!("{:>p$}", -1, p = p),
            (None, None) => "-1".to_string(),
        };

        match style {
            CallerStyle::Short => format!("{}({})", self.file_name(), line),
            CallerStyle::Long => {
                let package = self.package();
                if package.is_empty() {
                    format!("{}({})", self.file, line)
                } else {
                    format!("{}/{}({})", package.replace("::", "/"), self.file_name(), line)
                }
            }
            CallerStyle::Function => format!("{}({})", self.function(), line),
            CallerStyle::QualifiedFunction => format!("{}({})", self.function, line),
        }
    }
}

impl Default for Caller {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display(CallerStyle::Short), f)
    }
}

/// [`Caller`] rendered in a chosen [`CallerStyle`].
///
/// Honours the standard formatting flags with fixed-width semantics:
/// - precision pads the line number with spaces to that width;
/// - width keeps the last `width` characters of a longer string, or the first
///   `width` characters when left-aligned (`{:<20}`);
/// - a shorter string is left-padded with spaces up to `width`.
pub struct CallerDisplay<'a> {
    caller: &'a Caller,
    style: CallerStyle,
}

impl fmt::Display for CallerDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.caller.render(self.style, f.precision());

        let Some(width) = f.width() else {
            return f.write_str(&s);
        };

        let len = s.chars().count();
        if width <= len {
            let kept: String = if matches!(f.align(), Some(fmt::Alignment::Left)) {
                s.chars().take(width).collect()
            } else {
                s.chars().skip(len - width).collect()
            };
            f.write_str(&kept)
        } else {
            write!(f, "{:>width$}", s, width = width)
        }
    }
}
