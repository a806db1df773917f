use std::fmt::{Debug, Display, Formatter};

use super::{Code, Log};

impl<T: Display> Display for Log<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Log::None => Ok(()),
            Log::Default(s) | Log::Success(s) | Log::Result(s) | Log::Verbose(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

impl<T> Log<T> {
    /// Order of the log level, used to decide whether a given trace should
    /// be emitted under the configured verbosity.
    pub fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Default(_) => 1,
            Log::Success(_) => 2,
            Log::Result(_) => 3,
            Log::Verbose(_) => 4,
        }
    }
}

impl<TL: Display> Log<TL> {
    /// Trace a production matched at `pointer` during parsing or evaluation.
    /// Only emits under `debug_assertions`.
    pub fn trace_match<T: Debug>(&self, label: &str, pointer: usize, token: &T, code: &Code) {
        #[cfg(debug_assertions)]
        {
            if self.order() >= Log::Success(()).order() {
                println!(
                    "[{}; {}]: {:?} at {}",
                    self,
                    label,
                    token,
                    code.obtain_position(pointer)
                )
            }
        }
        #[cfg(not(debug_assertions))]
        {
            let _ = (label, pointer, token, code);
        }
    }

    /// Trace a failed match at `pointer`.
    pub fn trace_failure(&self, label: &str, pointer: usize, code: &Code) {
        #[cfg(debug_assertions)]
        {
            if self.order() >= Log::Result(()).order() {
                println!(
                    "[{}; {}]: failed at {}",
                    self,
                    label,
                    code.obtain_position(pointer)
                )
            }
        }
        #[cfg(not(debug_assertions))]
        {
            let _ = (label, pointer, code);
        }
    }
}
