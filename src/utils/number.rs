use std::fmt::Display;

pub struct NumberUtils;

impl NumberUtils {
    /// Groups the integer digits of `num` in threes with `,`.
    ///
    /// A leading sign and any fractional part are kept as they are.
    pub fn format_number<N: Display>(num: N) -> String {
        let text = num.to_string();
        let (sign, rest) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", text.as_str()),
        };

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (digits, tail) = rest.split_at(digits_end);

        let mut grouped = String::with_capacity(text.len() + digits.len() / 3);
        grouped.push_str(sign);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        grouped.push_str(tail);
        grouped
    }

    pub fn format_size(size: u64) -> String {
        const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
        let mut value = size as f64;
        let mut unit = 0;

        while value >= 1024.0 && unit < UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }

        if unit == 0 {
            format!("{} {}", Self::format_number(size), UNITS[0])
        } else {
            format!("{:.1} {}", value, UNITS[unit])
        }
    }
}

pub fn format_number<N: Display>(num: N) -> String {
    NumberUtils::format_number(num)
}
