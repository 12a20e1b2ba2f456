//! Japanese public holidays, computed from the holiday law.
//!
//! Produces the holiday calendar document the server reads. Rules follow
//! the law as it stands since 2020, including the substitute holiday
//! (振替休日) and the citizens' holiday (国民の休日) between two holidays.
//! Earlier years are not reproduced.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::schedule::HolidayCalendar;

pub const SUBSTITUTE_HOLIDAY: &str = "振替休日";
pub const CITIZENS_HOLIDAY: &str = "国民の休日";

/// Name of the holiday on `date`, if it is one.
pub fn holiday_name(date: NaiveDate) -> Option<&'static str> {
    if let Some(name) = statutory_holiday(date) {
        return Some(name);
    }

    let prev = date.checked_sub_days(Days::new(1))?;
    let next = date.checked_add_days(Days::new(1))?;
    if statutory_holiday(prev).is_some() && statutory_holiday(next).is_some() {
        return Some(CITIZENS_HOLIDAY);
    }

    // A holiday on Sunday moves to the first following day that is not
    // itself a holiday, so walk back over the run of holidays before `date`.
    let mut day = prev;
    while statutory_holiday(day).is_some() {
        if day.weekday() == Weekday::Sun {
            return Some(SUBSTITUTE_HOLIDAY);
        }
        day = day.checked_sub_days(Days::new(1))?;
    }

    None
}

/// Every holiday from `from` to `to`, inclusive.
pub fn japanese_holidays(from: NaiveDate, to: NaiveDate) -> HolidayCalendar {
    from.iter_days()
        .take_while(|day| *day <= to)
        .filter_map(|day| holiday_name(day).map(|name| (day, name.to_string())))
        .collect()
}

/// Holidays named in the law itself, without substitutes.
fn statutory_holiday(date: NaiveDate) -> Option<&'static str> {
    statutory_holidays(date.year())
        .into_iter()
        .find(|(day, _)| *day == date)
        .map(|(_, name)| name)
}

fn statutory_holidays(year: i32) -> Vec<(NaiveDate, &'static str)> {
    let fixed = |month, day, name| NaiveDate::from_ymd_opt(year, month, day).map(|d| (d, name));
    let monday = |month, n, name| {
        NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Mon, n).map(|d| (d, name))
    };

    let mut days = vec![
        fixed(1, 1, "元日"),
        monday(1, 2, "成人の日"),
        fixed(2, 11, "建国記念の日"),
        fixed(2, 23, "天皇誕生日"),
        fixed(3, equinox_day(year, 20.8431), "春分の日"),
        fixed(4, 29, "昭和の日"),
        fixed(5, 3, "憲法記念日"),
        fixed(5, 4, "みどりの日"),
        fixed(5, 5, "こどもの日"),
        monday(9, 3, "敬老の日"),
        fixed(9, equinox_day(year, 23.2488), "秋分の日"),
        fixed(11, 3, "文化の日"),
        fixed(11, 23, "勤労感謝の日"),
    ];

    // The Olympic years moved three holidays by special law.
    match year {
        2020 => days.extend([
            fixed(7, 23, "海の日"),
            fixed(7, 24, "スポーツの日"),
            fixed(8, 10, "山の日"),
        ]),
        2021 => days.extend([
            fixed(7, 22, "海の日"),
            fixed(7, 23, "スポーツの日"),
            fixed(8, 8, "山の日"),
        ]),
        _ => days.extend([
            monday(7, 3, "海の日"),
            fixed(8, 11, "山の日"),
            monday(10, 2, "スポーツの日"),
        ]),
    }

    days.into_iter().flatten().collect()
}

/// Day of the month of an equinox, by the approximation used for the
/// official announcements. Valid for 1980-2099.
fn equinox_day(year: i32, base: f64) -> u32 {
    let since = year - 1980;
    let day = base + 0.242194 * f64::from(since) - f64::from(since.div_euclid(4));
    day.floor() as u32
}
