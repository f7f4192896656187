//! Trace Record Model
//!
//! Value types for one gateway log record: the shared header and the
//! two concrete record kinds (request, response).

use serde::Serialize;

/// Fields shared by every record kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordHeader {
    /// 1-based line number in the source log
    pub lineno: usize,
    /// Timestamp token, verbatim from the log
    pub timestamp: String,
    /// Severity token, verbatim from the log
    pub level: String,
    /// Hierarchical correlation id, segments joined by ';'
    pub id: String,
}

/// An inbound or outbound call attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    #[serde(flatten)]
    pub header: RecordHeader,
    /// Source address of the caller
    pub addr: String,
    pub tenant: String,
    pub method: String,
    pub resource: String,
    /// Trailing fields, verbatim in original order
    pub params: Vec<String>,
}

/// The outcome of a previously issued request with the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    #[serde(flatten)]
    pub header: RecordHeader,
    pub status_code: String,
    /// Elapsed time in microseconds; 0 when the log carried no timing
    pub elapsed_us: u64,
    pub params: Vec<String>,
}

/// Closed union over the two record kinds. The kind set is fixed, so
/// all dispatch is an exhaustive match over the tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Record {
    #[serde(rename = "request")]
    Request(Request),
    #[serde(rename = "response")]
    Response(Response),
}

impl Record {
    pub fn header(&self) -> &RecordHeader {
        match self {
            Record::Request(req) => &req.header,
            Record::Response(res) => &res.header,
        }
    }

    /// Human-readable label, one entry per display line.
    pub fn label_lines(&self) -> Vec<String> {
        match self {
            Record::Request(req) => req.label_lines(),
            Record::Response(res) => res.label_lines(),
        }
    }
}

impl Request {
    pub fn label_lines(&self) -> Vec<String> {
        let mut lines = self.header.label_lines();
        lines.push(format!("REQ {} {}", self.addr, self.tenant));
        lines.push(format!("{} {}", self.method, self.resource));
        lines.extend(self.params.iter().cloned());
        lines
    }
}

impl Response {
    pub fn label_lines(&self) -> Vec<String> {
        let mut lines = self.header.label_lines();
        lines.push(format!(
            "RES {} ( {} ms )",
            self.status_code,
            elapsed_ms_display(self.elapsed_us)
        ));
        lines.extend(self.params.iter().cloned());
        lines
    }
}

impl RecordHeader {
    fn label_lines(&self) -> Vec<String> {
        vec![
            format!("[ {} ]", self.lineno),
            format!("{} {}", self.timestamp, self.level),
            self.id.clone(),
        ]
    }
}

/// Milliseconds display value: round half to even, sub-millisecond
/// timings show as "< 1".
fn elapsed_ms_display(elapsed_us: u64) -> String {
    let ms = (elapsed_us as f64 / 1000.0).round_ties_even() as u64;
    if ms > 0 {
        ms.to_string()
    } else {
        "< 1".to_string()
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label_lines().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(lineno: usize, id: &str) -> RecordHeader {
        RecordHeader {
            lineno,
            timestamp: "13:24:51.023".to_string(),
            level: "INFO".to_string(),
            id: id.to_string(),
        }
    }

    #[test]
    fn test_request_label_lines() {
        let req = Request {
            header: header(12, "821224/proxy"),
            addr: "10.0.2.15:46968".to_string(),
            tenant: "diku".to_string(),
            method: "GET".to_string(),
            resource: "/instance-storage/instances".to_string(),
            params: vec!["limit=30".to_string()],
        };
        let lines = req.label_lines();
        assert_eq!(lines[0], "[ 12 ]");
        assert_eq!(lines[1], "13:24:51.023 INFO");
        assert_eq!(lines[2], "821224/proxy");
        assert_eq!(lines[3], "REQ 10.0.2.15:46968 diku");
        assert_eq!(lines[4], "GET /instance-storage/instances");
        assert_eq!(lines[5], "limit=30");
    }

    #[test]
    fn test_response_label_rounds_to_ms() {
        let res = Response {
            header: header(7, "821224/proxy"),
            status_code: "200".to_string(),
            elapsed_us: 145571,
            params: vec![],
        };
        assert_eq!(res.label_lines()[3], "RES 200 ( 146 ms )");
    }

    #[test]
    fn test_response_label_sub_millisecond() {
        let res = Response {
            header: header(7, "x"),
            status_code: "204".to_string(),
            elapsed_us: 420,
            params: vec![],
        };
        assert_eq!(res.label_lines()[3], "RES 204 ( < 1 ms )");
    }

    #[test]
    fn test_elapsed_rounds_half_to_even() {
        // 2500 us sits exactly between 2 and 3 ms; ties go to even
        assert_eq!(elapsed_ms_display(2500), "2");
        assert_eq!(elapsed_ms_display(3500), "4");
    }

    #[test]
    fn test_display_joins_label_lines() {
        let rec = Record::Response(Response {
            header: header(7, "a;b"),
            status_code: "500".to_string(),
            elapsed_us: 2000,
            params: vec![],
        });
        assert_eq!(rec.to_string(), "[ 7 ]\n13:24:51.023 INFO\na;b\nRES 500 ( 2 ms )");
    }

    #[test]
    fn test_record_header_accessor() {
        let rec = Record::Response(Response {
            header: header(3, "a;b"),
            status_code: "404".to_string(),
            elapsed_us: 0,
            params: vec![],
        });
        assert_eq!(rec.header().lineno, 3);
        assert_eq!(rec.header().id, "a;b");
    }
}
