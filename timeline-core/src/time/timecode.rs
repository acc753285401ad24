//! SMPTE-style timecode formatting, including drop-frame at 29.97/59.94.

use super::rational_time::RationalTime;
use crate::error::{Error, Result};

fn is_ntsc_rate(rate: f64) -> bool {
    (rate - 29.97).abs() < 0.05 || (rate - 59.94).abs() < 0.05
}

fn drop_frames_for(nominal_fps: i64) -> i64 {
    if nominal_fps >= 60 {
        4
    } else {
        2
    }
}

fn split_fields(total_frames: i64, nominal_fps: i64) -> (i64, i64, i64, i64) {
    let ff = total_frames.rem_euclid(nominal_fps);
    let secs_total = total_frames.div_euclid(nominal_fps);
    let ss = secs_total.rem_euclid(60);
    let mins_total = secs_total.div_euclid(60);
    let mm = mins_total.rem_euclid(60);
    let hh = mins_total.div_euclid(60);
    (hh, mm, ss, ff)
}

fn drop_adjust(total_frames: i64, nominal_fps: i64) -> i64 {
    let drop_frames = drop_frames_for(nominal_fps);
    let frames_per_minute = nominal_fps * 60 - drop_frames;
    let frames_per_10_minutes = nominal_fps * 600;
    let d = total_frames.div_euclid(frames_per_10_minutes);
    let m = total_frames.rem_euclid(frames_per_10_minutes);
    if m < drop_frames {
        total_frames + drop_frames * 9 * d
    } else {
        total_frames + drop_frames * 9 * d + drop_frames * ((m - drop_frames) / frames_per_minute)
    }
}

/// Formats `rt` as `HH:MM:SS:FF` (or `HH:MM:SS;FF` if `dropframe`).
pub fn to_timecode(rt: &RationalTime, rate: f64, dropframe: bool) -> Result<String> {
    if dropframe && !is_ntsc_rate(rate) {
        return Err(Error::NonDropframeRate(rate));
    }
    let nominal_fps = rate.round() as i64;
    let total_frames = rt.value_rescaled_to(rate)?.round() as i64;
    let (hh, mm, ss, ff) = if dropframe {
        split_fields(drop_adjust(total_frames, nominal_fps), nominal_fps)
    } else {
        split_fields(total_frames, nominal_fps)
    };
    let sep = if dropframe { ';' } else { ':' };
    Ok(format!("{hh:02}:{mm:02}:{ss:02}{sep}{ff:02}"))
}

/// Parses a timecode string produced by [`to_timecode`] back into a
/// `RationalTime` at `rate`.
pub fn from_timecode(timecode: &str, rate: f64) -> Result<RationalTime> {
    let bytes: Vec<char> = timecode.chars().collect();
    let invalid = || Error::InvalidTimecodeString(timecode.to_string());

    // Expect exactly three ':'/';' separators among four numeric fields.
    let mut fields = Vec::with_capacity(4);
    let mut current = String::new();
    let mut last_sep = None;
    for c in &bytes {
        if *c == ':' || *c == ';' {
            fields.push(current.clone());
            current.clear();
            last_sep = Some(*c);
        } else {
            current.push(*c);
        }
    }
    fields.push(current);
    if fields.len() != 4 {
        return Err(invalid());
    }
    let dropframe = last_sep == Some(';');

    let mut nums = [0i64; 4];
    for (i, f) in fields.iter().enumerate() {
        if f.is_empty() || !f.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        nums[i] = f.parse::<i64>().map_err(|_| invalid())?;
    }
    let [hh, mm, ss, ff] = nums;

    let nominal_fps = rate.round() as i64;
    if ff >= nominal_fps {
        return Err(Error::TimecodeRateMismatch { frame: ff, rate });
    }
    if dropframe && !is_ntsc_rate(rate) {
        return Err(Error::NonDropframeRate(rate));
    }

    let frame_number = if dropframe {
        let drop_frames = drop_frames_for(nominal_fps);
        let total_minutes = hh * 60 + mm;
        nominal_fps * 3600 * hh + nominal_fps * 60 * mm + nominal_fps * ss + ff
            - drop_frames * (total_minutes - total_minutes / 10)
    } else {
        (hh * 3600 + mm * 60 + ss) * nominal_fps + ff
    };

    Ok(RationalTime::new(frame_number as f64, rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_drop_roundtrip() {
        let rt = RationalTime::new(108_090.0, 30.0);
        let tc = to_timecode(&rt, 30.0, false).unwrap();
        assert_eq!(tc, "01:00:03:00");
        let back = from_timecode(&tc, 30.0).unwrap();
        assert_eq!(back, rt);
    }

    #[test]
    fn drop_frame_one_hour() {
        let rt = RationalTime::new(107_892.0, 29.97);
        let tc = to_timecode(&rt, 29.97, true).unwrap();
        assert_eq!(tc, "01:00:00;00");
        let back = from_timecode(&tc, 29.97).unwrap();
        assert_eq!(back.value, rt.value);
    }

    #[test]
    fn drop_frame_skips_frame_numbers_at_minute_boundary() {
        // Real-world rule: :00 and :01 are skipped at the top of each minute
        // except minutes that are a multiple of ten.
        let tc = to_timecode(&RationalTime::new(1798.0, 29.97), 29.97, true).unwrap();
        assert_eq!(tc, "00:01:00;02");
    }

    #[test]
    fn dropframe_requires_ntsc_rate() {
        let rt = RationalTime::new(10.0, 24.0);
        assert!(matches!(
            to_timecode(&rt, 24.0, true),
            Err(Error::NonDropframeRate(_))
        ));
    }

    #[test]
    fn malformed_timecode_string() {
        assert!(matches!(
            from_timecode("not-a-timecode", 24.0),
            Err(Error::InvalidTimecodeString(_))
        ));
    }

    #[test]
    fn timecode_rate_mismatch() {
        assert!(matches!(
            from_timecode("00:00:00:30", 24.0),
            Err(Error::TimecodeRateMismatch { .. })
        ));
    }
}
