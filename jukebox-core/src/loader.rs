use std::{
    fmt, fs,
    path::PathBuf,
    sync::Arc,
    thread,
    time::Instant,
};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use crate::{
    data::{Period, RequestPayload},
    error::Error,
};

/// The backend holding the request rows. Without a period the backend picks
/// one and names it in the payload.
pub trait RequestSource: Send + Sync {
    fn fetch(&self, period: Option<Period>) -> Result<RequestPayload, Error>;
}

/// Reads the payload from a JSON file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RequestSource for FileSource {
    fn fetch(&self, period: Option<Period>) -> Result<RequestPayload, Error> {
        match period {
            Some(period) => log::info!("loading period {} from {:?}", period, self.path),
            None => log::info!("loading requests from {:?}", self.path),
        }
        let json = fs::read_to_string(&self.path)?;
        RequestPayload::from_json(&json)
    }
}

/// Issue order of a load. Later loads always compare greater.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct LoadSeq(pub(crate) u64);

impl fmt::Display for LoadSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub struct Completed {
    pub seq: LoadSeq,
    pub result: Result<RequestPayload, Error>,
}

/// Runs each fetch on its own thread and hands results back over a channel, in
/// whatever order they finish.
pub struct Loader {
    source: Arc<dyn RequestSource>,
    last: u64,
    sender: Sender<Completed>,
    receiver: Receiver<Completed>,
}

impl Loader {
    pub fn new(source: Arc<dyn RequestSource>) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            source,
            last: 0,
            sender,
            receiver,
        }
    }

    pub fn start(&mut self, period: Option<Period>) -> LoadSeq {
        self.last += 1;
        let seq = LoadSeq(self.last);
        log::debug!("starting load {} for period {:?}", seq, period);

        thread::spawn({
            let source = self.source.clone();
            let sender = self.sender.clone();

            move || {
                let result = source.fetch(period).map_err(|err| match err {
                    Error::LoadFailed(_) => err,
                    other => Error::LoadFailed(other.to_string()),
                });
                if sender.send(Completed { seq, result }).is_err() {
                    log::warn!("load {} finished after the loader was dropped", seq);
                }
            }
        });
        seq
    }

    pub fn try_next(&self) -> Option<Completed> {
        self.receiver.try_recv().ok()
    }

    /// Blocks until a load finishes or `deadline` passes.
    pub fn next_before(&self, deadline: Instant) -> Option<Completed> {
        let timeout = deadline.saturating_duration_since(Instant::now());
        match self.receiver.recv_timeout(timeout) {
            Ok(completed) => Some(completed),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
