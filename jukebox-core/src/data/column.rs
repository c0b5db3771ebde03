use crate::data::{RequestSet, RequestStatus, SongRequest};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Column {
    Inbox,
    Playlist,
}

impl Column {
    /// The one place deciding where a status is shown. `None` hides the request
    /// from both columns.
    pub fn for_status(status: RequestStatus) -> Option<Self> {
        match status {
            RequestStatus::Pending => Some(Self::Inbox),
            RequestStatus::Staged | RequestStatus::Approved | RequestStatus::Played => {
                Some(Self::Playlist)
            }
            RequestStatus::Rejected => None,
        }
    }

    pub fn element_id(self) -> &'static str {
        match self {
            Self::Inbox => "song-inbox",
            Self::Playlist => "song-playlist",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Partition<'a> {
    pub inbox: Vec<&'a SongRequest>,
    pub playlist: Vec<&'a SongRequest>,
    pub hidden: Vec<&'a SongRequest>,
}

impl<'a> Partition<'a> {
    pub fn column(&self, column: Column) -> &[&'a SongRequest] {
        match column {
            Column::Inbox => &self.inbox,
            Column::Playlist => &self.playlist,
        }
    }
}

/// Splits `requests` by status alone, keeping backend order inside each column.
pub fn partition(requests: &RequestSet) -> Partition<'_> {
    let mut split = Partition::default();
    for request in requests.iter() {
        match Column::for_status(request.status) {
            Some(Column::Inbox) => split.inbox.push(request),
            Some(Column::Playlist) => split.playlist.push(request),
            None => split.hidden.push(request),
        }
    }
    split
}
