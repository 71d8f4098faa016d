use std::time::Duration;

use crate::error::Result;

/// A text command channel to the target.
///
/// `write` sends one command line, `read` returns whatever the target
/// answered. Implementations log every exchange under their [`name`](Link::name).
pub trait Link {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Send one command line.
    fn write(&mut self, text: &str) -> Result<()>;

    /// Collect the reply to the last command, trimmed.
    fn read(&mut self) -> Result<String>;

    /// Write `command`, sleep for `wait`, then read the reply.
    fn run(&mut self, command: &str, wait: Duration) -> Result<String> {
        self.write(command)?;
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
        self.read()
    }
}

impl<L: Link + ?Sized> Link for Box<L> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn write(&mut self, text: &str) -> Result<()> {
        (**self).write(text)
    }

    fn read(&mut self) -> Result<String> {
        (**self).read()
    }

    fn run(&mut self, command: &str, wait: Duration) -> Result<String> {
        (**self).run(command, wait)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Echo {
        last: String,
    }

    impl Link for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn write(&mut self, text: &str) -> Result<()> {
            self.last = text.trim().to_string();
            Ok(())
        }

        fn read(&mut self) -> Result<String> {
            Ok(std::mem::take(&mut self.last))
        }
    }

    #[test]
    fn run_writes_then_reads() {
        let mut link = Echo::default();
        assert_eq!(link.run(" hello ", Duration::ZERO).unwrap(), "hello");
        assert_eq!(link.read().unwrap(), "");
    }

    #[test]
    fn boxed_link_forwards() {
        let mut link: Box<dyn Link> = Box::new(Echo::default());
        assert_eq!(link.name(), "echo");
        assert_eq!(link.run("ping", Duration::from_millis(1)).unwrap(), "ping");
    }
}
