
/// Limits applied to a single run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Nested calls allowed before the run stops with `out of memory`.
    pub max_depth: usize,
    /// Stack reserved for the thread the pipeline runs on, in bytes. Deeper
    /// evaluation continues on stack segments allocated as needed.
    pub stack_size: usize,
}

pub const DEFAULT_MAX_DEPTH: usize = 200_000;

pub const DEFAULT_STACK_SIZE: usize = 256 * 1024 * 1024;

impl Default for Config {
    fn default() -> Config {
        Config {
            max_depth: DEFAULT_MAX_DEPTH,
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl Config {
    pub fn with_max_depth(self, max_depth: usize) -> Config {
        Config { max_depth, ..self }
    }

    pub fn with_stack_size(self, stack_size: usize) -> Config {
        Config { stack_size, ..self }
    }
}
