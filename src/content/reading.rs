use serde::Deserialize;

use crate::locale::Locale;

/// Words per minute for each locale.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadingSpeed {
    #[serde(default = "ReadingSpeed::default_ru")]
    pub ru: u32,
    #[serde(default = "ReadingSpeed::default_en")]
    pub en: u32,
}

impl ReadingSpeed {
    fn default_ru() -> u32 {
        180
    }

    fn default_en() -> u32 {
        200
    }

    pub fn for_locale(&self, locale: Locale) -> u32 {
        match locale {
            Locale::Ru => self.ru,
            Locale::En => self.en,
        }
    }
}

impl Default for ReadingSpeed {
    fn default() -> Self {
        ReadingSpeed {
            ru: Self::default_ru(),
            en: Self::default_en(),
        }
    }
}

pub fn word_count(body: &str) -> usize {
    body.split_whitespace().count()
}

/// Minutes, rounded up, never less than one. A rate of zero is treated as one
/// word per minute.
pub fn estimate_reading_time(body: &str, words_per_minute: u32) -> u32 {
    let words = word_count(body);
    let rate = words_per_minute.max(1) as usize;
    let minutes = words.div_ceil(rate);
    u32::try_from(minutes).unwrap_or(u32::MAX).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_one_minute() {
        assert_eq!(estimate_reading_time("", 200), 1);
        assert_eq!(estimate_reading_time("   \n\t ", 200), 1);
        assert_eq!(estimate_reading_time("one two", 200), 1);
    }

    #[test]
    fn test_rounds_up() {
        let body = vec!["слово"; 201].join(" ");
        assert_eq!(estimate_reading_time(&body, 200), 2);
        let body = vec!["word"; 400].join("\n\n  ");
        assert_eq!(estimate_reading_time(&body, 200), 2);
    }

    #[test]
    fn test_monotonic_in_word_count() {
        let mut previous = 0;
        for words in 0..1000 {
            let body = vec!["w"; words].join(" ");
            let minutes = estimate_reading_time(&body, 180);
            assert!(minutes >= previous);
            assert!(minutes >= 1);
            previous = minutes;
        }
    }

    #[test]
    fn test_zero_rate() {
        assert_eq!(estimate_reading_time("a b c", 0), 3);
    }

    #[test]
    fn test_speed_per_locale() {
        let speed = ReadingSpeed { ru: 150, en: 250 };
        assert_eq!(speed.for_locale(Locale::Ru), 150);
        assert_eq!(speed.for_locale(Locale::En), 250);
        assert_eq!(ReadingSpeed::default().for_locale(Locale::Ru), 180);
    }
}
