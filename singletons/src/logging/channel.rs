use crossbeam::channel::{Receiver, Sender, unbounded};
use log::{Level, LevelFilter, Metadata, Record};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// A `log` backend that forwards records over a channel, so a host can surface singleton
/// lifecycle messages (claims, evictions, ignored duplicates) in its own console.
#[derive(Debug)]
pub struct ChannelLogger {
    sender: Sender<LogMessage>,
    level: LevelFilter,
}

impl log::Log for ChannelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = self.sender.try_send(LogMessage {
                level: record.metadata().level(),
                target: record.target().to_owned(),
                message: format!("{}", record.args()),
            });
        }
    }

    fn flush(&self) {}
}

impl ChannelLogger {
    pub fn new(sender: Sender<LogMessage>, level: LevelFilter) -> Self {
        Self { sender, level }
    }

    pub fn with_receiver(level: LevelFilter) -> (Self, Receiver<LogMessage>) {
        let (sender, receiver) = unbounded();
        (Self::new(sender, level), receiver)
    }

    /// Install as the global logger. Fails if another logger is already installed.
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use log::Log;

    use super::*;

    #[test]
    fn forwards_enabled_records() {
        // Given
        let (logger, receiver) = ChannelLogger::with_receiver(LevelFilter::Debug);

        // When
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .target("rusty_singletons::singleton")
                .args(format_args!("AudioManager slot claimed by 0v0"))
                .build(),
        );

        // Then
        assert_eq!(
            receiver.try_recv().unwrap(),
            LogMessage {
                level: Level::Debug,
                target: "rusty_singletons::singleton".into(),
                message: "AudioManager slot claimed by 0v0".into(),
            }
        );
    }

    #[test]
    fn drops_records_above_level() {
        let (logger, receiver) = ChannelLogger::with_receiver(LevelFilter::Info);

        logger.log(
            &Record::builder()
                .level(Level::Trace)
                .args(format_args!("noise"))
                .build(),
        );

        assert!(receiver.try_recv().is_err());
    }
}
