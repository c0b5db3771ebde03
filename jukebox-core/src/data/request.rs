use std::{collections::HashSet, fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::{data::Period, error::Error};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Staged,
    Approved,
    Played,
    Rejected,
}

impl RequestStatus {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "STAGED" => Some(Self::Staged),
            "APPROVED" => Some(Self::Approved),
            "PLAYED" => Some(Self::Played),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Staged => "STAGED",
            Self::Approved => "APPROVED",
            Self::Played => "PLAYED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl Default for RequestStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One student submission. Every text field is untrusted input.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongRequest {
    pub row_index: i64,
    pub artist: Arc<str>,
    pub song: Arc<str>,
    pub student_name: Arc<str>,
    pub link: Arc<str>,
    pub status: RequestStatus,
    pub period: Option<Period>,
}

impl SongRequest {
    pub fn title(&self) -> String {
        format!("{} — {}", self.artist, self.song)
    }
}

/// Only absolute http(s) links are ever used as a destination.
pub fn safe_href(link: &str) -> Option<Url> {
    let url = Url::parse(link.trim()).ok()?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Some(url),
        _ => None,
    }
}

/// Validates one raw backend record. Unknown keys are ignored.
pub fn normalize(raw: &Value) -> Result<SongRequest, Error> {
    let fields = raw
        .as_object()
        .ok_or_else(|| Error::malformed(None, "record is not an object"))?;

    let row_index = row_index(fields)?;
    let row = Some(row_index);

    let status = required_str(fields, "status", row)?;
    let status = RequestStatus::parse(status)
        .ok_or_else(|| Error::malformed(row, format!("unknown status {status:?}")))?;

    let period = match fields.get("period") {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            Period::from_value(value).map_err(|err| Error::malformed(row, err.to_string()))?,
        ),
    };

    Ok(SongRequest {
        row_index,
        artist: required_str(fields, "artist", row)?.into(),
        song: required_str(fields, "song", row)?.into(),
        student_name: required_str(fields, "studentName", row)?.into(),
        link: link(fields, row)?,
        status,
        period,
    })
}

fn row_index(fields: &Map<String, Value>) -> Result<i64, Error> {
    let value = fields
        .get("rowIndex")
        .or_else(|| fields.get("row"))
        .filter(|value| !value.is_null())
        .ok_or_else(|| Error::malformed(None, "missing rowIndex"))?;
    value
        .as_i64()
        .ok_or_else(|| Error::malformed(None, format!("rowIndex is not an integer: {value}")))
}

fn required_str<'a>(
    fields: &'a Map<String, Value>,
    key: &str,
    row: Option<i64>,
) -> Result<&'a str, Error> {
    match fields.get(key) {
        Some(Value::String(s)) => Ok(s),
        None | Some(Value::Null) => Err(Error::malformed(row, format!("missing {key}"))),
        Some(other) => Err(Error::malformed(
            row,
            format!("{key} is not a string: {other}"),
        )),
    }
}

fn link(fields: &Map<String, Value>, row: Option<i64>) -> Result<Arc<str>, Error> {
    let link = match fields.get("link") {
        Some(Value::String(s)) => s.trim(),
        None | Some(Value::Null) => "",
        Some(other) => {
            return Err(Error::malformed(
                row,
                format!("link is not a string: {other}"),
            ))
        }
    };
    if link.is_empty() {
        // Older rows only carry the YouTube video id.
        if let Some(Value::String(id)) = fields.get("videoId") {
            let id = id.trim();
            if !id.is_empty() {
                return Ok(format!("https://youtu.be/{id}").into());
            }
        }
    }
    Ok(link.into())
}

/// Payload delivered by the backend for one period.
#[derive(Clone, Debug, Deserialize)]
pub struct RequestPayload {
    pub period: Period,
    #[serde(default)]
    pub requests: Vec<Value>,
}

impl RequestPayload {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }
}

/// All requests of the active period, unique by row, in backend order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RequestSet {
    period: Option<Period>,
    requests: Vec<SongRequest>,
    rows: HashSet<i64>,
}

impl RequestSet {
    pub fn new(period: Period) -> Self {
        Self {
            period: Some(period),
            ..Self::default()
        }
    }

    /// Normalizes every record of `payload`, skipping the ones that fail. The
    /// skipped errors are returned alongside the set.
    pub fn from_payload(payload: &RequestPayload) -> (Self, Vec<Error>) {
        let mut set = Self::new(payload.period);
        let mut skipped = Vec::new();
        for raw in &payload.requests {
            let result = normalize(raw).and_then(|request| set.insert(request));
            if let Err(err) = result {
                log::warn!("skipping record: {err}");
                skipped.push(err);
            }
        }
        (set, skipped)
    }

    /// Appends `request`, scoping it to this set's period. Requests of another
    /// period and duplicate rows are refused.
    pub fn insert(&mut self, mut request: SongRequest) -> Result<(), Error> {
        let row = Some(request.row_index);
        match (self.period, request.period) {
            (Some(active), Some(own)) if active != own => {
                return Err(Error::malformed(
                    row,
                    format!("belongs to period {own}, not {active}"),
                ));
            }
            (Some(active), _) => request.period = Some(active),
            (None, _) => {}
        }
        if !self.rows.insert(request.row_index) {
            return Err(Error::malformed(row, "duplicate rowIndex"));
        }
        self.requests.push(request);
        Ok(())
    }

    pub fn period(&self) -> Option<Period> {
        self.period
    }

    pub fn get(&self, row_index: i64) -> Option<&SongRequest> {
        self.requests.iter().find(|r| r.row_index == row_index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SongRequest> {
        self.requests.iter()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl FromIterator<SongRequest> for RequestSet {
    /// Collects without period scoping; later duplicates of a row are dropped.
    fn from_iter<I: IntoIterator<Item = SongRequest>>(iter: I) -> Self {
        let mut set = Self::default();
        for request in iter {
            if let Err(err) = set.insert(request) {
                log::warn!("skipping record: {err}");
            }
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn daft_punk() -> Value {
        json!({
            "rowIndex": 1,
            "artist": "Daft Punk",
            "song": "One More Time",
            "studentName": "Alice",
            "link": "https://youtube.com/x",
            "status": "PENDING"
        })
    }

    #[test]
    fn normalizes_complete_record() {
        let request = normalize(&daft_punk()).unwrap();
        assert_eq!(request.row_index, 1);
        assert_eq!(&*request.artist, "Daft Punk");
        assert_eq!(&*request.student_name, "Alice");
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.title(), "Daft Punk — One More Time");
    }

    #[test]
    fn ignores_unknown_fields() {
        let mut raw = daft_punk();
        raw["email"] = json!("stu@example.net");
        raw["timestamp"] = json!("2023-01-01");
        assert!(normalize(&raw).is_ok());
    }

    #[test]
    fn rejects_missing_student_name() {
        let mut raw = daft_punk();
        raw.as_object_mut().unwrap().remove("studentName");
        match normalize(&raw) {
            Err(Error::MalformedRecord { row, reason }) => {
                assert_eq!(row, Some(1));
                assert!(reason.contains("studentName"));
            }
            other => panic!("expected malformed record, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_integer_row_index() {
        for bad in [json!("1"), json!(1.5), json!(1.0), json!(null)] {
            let mut raw = daft_punk();
            raw["rowIndex"] = bad;
            assert!(matches!(
                normalize(&raw),
                Err(Error::MalformedRecord { row: None, .. })
            ));
        }
    }

    #[test]
    fn rejects_unknown_status_and_wrong_types() {
        let mut raw = daft_punk();
        raw["status"] = json!("MAYBE");
        assert!(normalize(&raw).is_err());

        let mut raw = daft_punk();
        raw["artist"] = json!(42);
        assert!(normalize(&raw).is_err());

        assert!(normalize(&json!(["not", "an", "object"])).is_err());
    }

    #[test]
    fn accepts_legacy_row_and_video_id() {
        let raw = json!({
            "row": 2,
            "song": "Mock Song",
            "artist": "Mock Artist",
            "studentName": "Student A",
            "videoId": "dQw4w9WgXcQ",
            "status": "pending"
        });
        let request = normalize(&raw).unwrap();
        assert_eq!(request.row_index, 2);
        assert_eq!(&*request.link, "https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(request.status, RequestStatus::Pending);
    }

    #[test]
    fn legacy_row_without_status_is_rejected() {
        let raw = json!({
            "row": 2,
            "song": "Mock Song",
            "artist": "Mock Artist",
            "studentName": "Student A",
            "videoId": "dQw4w9WgXcQ"
        });
        match normalize(&raw) {
            Err(Error::MalformedRecord { row, reason }) => {
                assert_eq!(row, Some(2));
                assert!(reason.contains("status"));
            }
            other => panic!("expected malformed record, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_rows_keep_the_first() {
        let mut set = RequestSet::new(Period(1));
        set.insert(normalize(&daft_punk()).unwrap()).unwrap();
        let mut again = daft_punk();
        again["artist"] = json!("Someone Else");
        assert!(set.insert(normalize(&again).unwrap()).is_err());
        assert_eq!(set.len(), 1);
        assert_eq!(&*set.get(1).unwrap().artist, "Daft Punk");
    }

    #[test]
    fn missing_link_is_empty() {
        let mut raw = daft_punk();
        raw.as_object_mut().unwrap().remove("link");
        assert_eq!(&*normalize(&raw).unwrap().link, "");
    }

    #[test]
    fn payload_skips_bad_records_and_keeps_order() {
        let payload = RequestPayload::from_json(
            &json!({
                "period": "Period 1",
                "requests": [
                    {"rowIndex": 5, "artist": "A", "song": "S", "studentName": "N", "status": "STAGED"},
                    {"rowIndex": 6, "artist": "B", "song": "T", "status": "PENDING"},
                    {"rowIndex": 3, "artist": "C", "song": "U", "studentName": "M", "status": "PENDING", "period": 1},
                    {"rowIndex": 4, "artist": "D", "song": "V", "studentName": "O", "status": "PENDING", "period": 2},
                    {"rowIndex": 5, "artist": "E", "song": "W", "studentName": "P", "status": "PENDING"}
                ]
            })
            .to_string(),
        )
        .unwrap();

        let (set, skipped) = RequestSet::from_payload(&payload);
        let rows: Vec<_> = set.iter().map(|r| r.row_index).collect();
        assert_eq!(rows, vec![5, 3]);
        assert_eq!(skipped.len(), 3);
        assert!(set.iter().all(|r| r.period == Some(Period(1))));
    }
}
