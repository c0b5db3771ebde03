use serde::Deserialize;

use crate::{
    data::{safe_href, Period, RequestStatus, SongRequest},
    error::Error,
};

/// What a student fills in on the request form.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Submission {
    pub artist: String,
    pub song: String,
    pub student_name: String,
    pub link: String,
    pub period: Option<Period>,
}

impl Submission {
    pub fn validate(&self) -> Result<(), Error> {
        let required = [
            ("artist", &self.artist),
            ("song", &self.song),
            ("studentName", &self.student_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::InvalidSubmission(field));
            }
        }
        let link = self.link.trim();
        if !link.is_empty() && safe_href(link).is_none() {
            return Err(Error::InvalidSubmission("link"));
        }
        Ok(())
    }

    /// New PENDING request for the backend row `row_index`.
    pub fn into_request(self, row_index: i64) -> Result<SongRequest, Error> {
        self.validate()?;
        Ok(SongRequest {
            row_index,
            artist: self.artist.trim().into(),
            song: self.song.trim().into(),
            student_name: self.student_name.trim().into(),
            link: self.link.trim().into(),
            status: RequestStatus::default(),
            period: self.period,
        })
    }
}
