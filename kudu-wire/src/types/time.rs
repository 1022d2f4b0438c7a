use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, ParseError as ChronoParseError, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use snafu::{ensure, OptionExt, ResultExt, Snafu};

use crate::{AntelopeType, ByteStream, InvalidValue, Primitive, SerializeError};


#[derive(Debug, Snafu)]
pub enum InvalidTime {
    #[snafu(display(r#"cannot parse date: "{repr}""#))]
    Parse { repr: String, source: ChronoParseError },

    #[snafu(display("invalid calendar date or time"))]
    InvalidDate,

    #[snafu(display("{datetime} is out of range for a {typename}"))]
    OutOfRange { typename: &'static str, datetime: String },

    #[snafu(display("{datetime} has sub-millisecond precision, only millisecond precision is supported"))]
    SubMillisecond { datetime: String },
}


const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";
const DATE_FORMAT_NO_SECS: &str = "%Y-%m-%dT%H:%M";

/// return a date in UTC (we don't use naive datetimes)
fn parse_date(s: &str) -> Result<DateTime<Utc>, InvalidTime> {
    Ok(NaiveDateTime::parse_from_str(s, DATE_FORMAT)
       .or_else(|_| NaiveDateTime::parse_from_str(s, DATE_FORMAT_NO_SECS))
       .context(ParseSnafu { repr: s })?
       .and_utc())
}

fn datetime_from_fields(year: i32, month: u32, day: u32,
                        hour: u32, min: u32, sec: u32, milli: u32) -> Result<DateTime<Utc>, InvalidTime> {
    Ok(NaiveDate::from_ymd_opt(year, month, day).context(InvalidDateSnafu)?
       .and_hms_milli_opt(hour, min, sec, milli).context(InvalidDateSnafu)?
       .and_utc())
}

macro_rules! impl_time_traits {
    ($typ:ty) => {
        impl Primitive for $typ {
            type Value = DateTime<Utc>;

            fn from_value(value: DateTime<Utc>) -> Result<Self, InvalidValue> {
                Ok(Self::from_datetime(value)?)
            }

            fn value(&self) -> DateTime<Utc> {
                self.to_datetime()
            }
        }

        impl fmt::Display for $typ {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.to_datetime().format(DATE_FORMAT))
            }
        }

        impl FromStr for $typ {
            type Err = InvalidTime;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_datetime(parse_date(s)?)
            }
        }

        impl TryFrom<DateTime<Utc>> for $typ {
            type Error = InvalidTime;

            fn try_from(dt: DateTime<Utc>) -> Result<Self, Self::Error> {
                Self::from_datetime(dt)
            }
        }

        impl From<$typ> for DateTime<Utc> {
            fn from(t: $typ) -> DateTime<Utc> {
                t.to_datetime()
            }
        }

        impl Serialize for $typ {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer
            {
                self.to_string().serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $typ {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s: String = String::deserialize(deserializer)?;
                Self::from_str(&s).map_err(|e| de::Error::custom(e.to_string()))
            }
        }
    }
}


// -----------------------------------------------------------------------------
//     UnixTimestamp
// -----------------------------------------------------------------------------

/// Point in time with second precision, encoded as a `uint32` number of
/// seconds since the Unix epoch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct UnixTimestamp(u32);

impl UnixTimestamp {
    pub fn new(value: impl Into<DateTime<Utc>>) -> Result<Self, InvalidTime> {
        Self::from_datetime(value.into())
    }

    pub fn from_ymd_hms(year: i32, month: u32, day: u32,
                        hour: u32, min: u32, sec: u32) -> Result<Self, InvalidTime> {
        Self::from_datetime(datetime_from_fields(year, month, day, hour, min, sec, 0)?)
    }

    /// Build a `UnixTimestamp` from a datetime, the sub-second part is truncated.
    pub fn from_datetime(dt: DateTime<Utc>) -> Result<Self, InvalidTime> {
        let secs = u32::try_from(dt.timestamp()).ok().context(OutOfRangeSnafu {
            typename: "UnixTimestamp",
            datetime: dt.to_rfc3339(),
        })?;
        Ok(UnixTimestamp(secs))
    }

    pub fn from_secs(secs: u32) -> Self {
        UnixTimestamp(secs)
    }

    pub fn as_secs(&self) -> u32 {
        self.0
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        // all u32 values are valid timestamps
        Utc.timestamp_opt(self.0 as i64, 0).single().unwrap_or_default()
    }
}

impl AntelopeType for UnixTimestamp {
    fn encode(&self, stream: &mut ByteStream) {
        stream.write_bytes(&self.0.to_le_bytes())
    }

    fn decode(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(UnixTimestamp(u32::from_le_bytes(stream.read_array()?)))
    }
}

impl_time_traits!(UnixTimestamp);


// -----------------------------------------------------------------------------
//     TimePoint
// -----------------------------------------------------------------------------

/// Point in time with millisecond precision, encoded as a `uint64` number
/// of microseconds since the Unix epoch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TimePoint(u64);

impl TimePoint {
    pub fn new(value: impl Into<DateTime<Utc>>) -> Result<Self, InvalidTime> {
        Self::from_datetime(value.into())
    }

    pub fn from_ymd_hms_milli(year: i32, month: u32, day: u32,
                              hour: u32, min: u32, sec: u32, milli: u32) -> Result<Self, InvalidTime> {
        Self::from_datetime(datetime_from_fields(year, month, day, hour, min, sec, milli)?)
    }

    /// Build a `TimePoint` from a datetime, which must not have a precision
    /// finer than the millisecond.
    pub fn from_datetime(dt: DateTime<Utc>) -> Result<Self, InvalidTime> {
        ensure!(dt.timestamp_subsec_nanos() % 1_000_000 == 0,
                SubMillisecondSnafu { datetime: dt.to_rfc3339() });
        let micros = u64::try_from(dt.timestamp_micros()).ok().context(OutOfRangeSnafu {
            typename: "TimePoint",
            datetime: dt.to_rfc3339(),
        })?;
        Ok(TimePoint(micros))
    }

    pub fn from_micros(micros: u64) -> Result<Self, InvalidTime> {
        let dt = i64::try_from(micros).ok()
            .and_then(|us| Utc.timestamp_micros(us).single())
            .context(OutOfRangeSnafu { typename: "TimePoint", datetime: format!("{micros}µs") })?;
        Self::from_datetime(dt)
    }

    pub fn as_micros(&self) -> u64 {
        self.0
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        // the value has been checked to be a valid datetime at construction
        Utc.timestamp_micros(self.0 as i64).single().unwrap_or_default()
    }
}

impl AntelopeType for TimePoint {
    fn encode(&self, stream: &mut ByteStream) {
        stream.write_bytes(&self.0.to_le_bytes())
    }

    fn decode(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        let micros = u64::from_le_bytes(stream.read_array()?);
        Ok(TimePoint::from_micros(micros).map_err(InvalidValue::from)?)
    }
}

impl_time_traits!(TimePoint);


// =============================================================================
//
//     Unittests
//
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use color_eyre::eyre::Result;
    use serde_json::json;
    use super::*;

    fn epoch() -> DateTime<Utc> {
        Utc.timestamp_opt(0, 0).unwrap()
    }

    #[test]
    fn unix_timestamps() -> Result<()> {
        let vals = [
            (UnixTimestamp::from_ymd_hms(1970, 1, 1, 0, 0, 0)?, "00000000"),
            (UnixTimestamp::from_ymd_hms(2040, 12, 31, 23, 59, 0)?, "44038d85"),
            (UnixTimestamp::from_ymd_hms(2021, 8, 26, 14, 1, 47)?, "cb9e2761"),
        ];
        for (ts, repr) in vals {
            assert_eq!(ts.to_hex(), repr);
            assert_eq!(UnixTimestamp::from_hex(repr)?, ts);
        }
        Ok(())
    }

    #[test]
    fn unix_timestamp_truncates_sub_seconds() -> Result<()> {
        let ts = UnixTimestamp::new(epoch() + Duration::milliseconds(1999))?;
        assert_eq!(ts.as_secs(), 1);
        assert!(UnixTimestamp::new(epoch() - Duration::seconds(1)).is_err());
        assert!(UnixTimestamp::from_ymd_hms(2107, 1, 1, 0, 0, 0).is_err());
        Ok(())
    }

    #[test]
    fn time_points() -> Result<()> {
        let vals = [
            (TimePoint::new(epoch() + Duration::milliseconds(1))?, "e803000000000000"),
            (TimePoint::new(epoch() + Duration::seconds(1))?, "40420f0000000000"),
            (TimePoint::from_ymd_hms_milli(2040, 12, 31, 23, 59, 0, 0)?, "005914efd2f50700"),
            (TimePoint::from_ymd_hms_milli(2021, 8, 26, 14, 1, 47, 0)?, "c008bdce76ca0500"),
        ];
        for (tp, repr) in vals {
            assert_eq!(tp.to_hex(), repr);
            assert_eq!(TimePoint::from_hex(repr)?, tp);
        }
        Ok(())
    }

    #[test]
    fn time_point_rejects_sub_milliseconds() {
        for micros in [1, 999_997, 999_998, 999_999, 184_549] {
            assert!(TimePoint::new(epoch() + Duration::microseconds(micros)).is_err(),
                    "{micros}µs should not be accepted");
        }
        assert!(TimePoint::new(epoch() + Duration::microseconds(184_000)).is_ok());
        // same constraint applies to decoded values
        assert!(TimePoint::from_hex("0100000000000000").is_err());
    }

    #[test]
    fn json() -> Result<()> {
        let tp = TimePoint::from_ymd_hms_milli(2021, 8, 26, 14, 1, 47, 184)?;
        assert_eq!(tp.to_json(), json!("2021-08-26T14:01:47.184"));
        assert_eq!(TimePoint::from_json(&json!("2021-08-26T14:01:47.184"))?, tp);

        let ts = UnixTimestamp::from_json(&json!("2040-12-31T23:59"))?;
        assert_eq!(ts, UnixTimestamp::from_ymd_hms(2040, 12, 31, 23, 59, 0)?);
        assert_eq!(ts.to_json(), json!("2040-12-31T23:59:00.000"));

        assert!(TimePoint::from_json(&json!("not a date")).is_err());
        Ok(())
    }
}
