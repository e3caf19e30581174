use chrono::{DateTime, Utc};

/// RFC 1123 date as used by the `Date` header and request signing.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

pub fn http_date_now() -> String {
    http_date(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_gmt_date() {
        let at = Utc.with_ymd_and_hms(2015, 11, 22, 8, 16, 38).unwrap();
        assert_eq!(http_date(at), "Sun, 22 Nov 2015 08:16:38 GMT");
    }
}
