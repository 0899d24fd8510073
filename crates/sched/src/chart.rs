//! Chart rendering for simulated schedules.

/// Renders a labelled series of `(event, value)` points.
pub trait Chart {
    type Output;

    fn render(&self, label: &str, points: &[(usize, f64)]) -> Self::Output;
}

#[cfg(feature = "plot")]
pub use text::TextChart;

#[cfg(feature = "plot")]
mod text {
    use super::Chart;

    /// Width of the y-axis label column.
    const AXIS: usize = 12;

    /// ASCII line chart: one column per sampled point, `*` marks the value.
    ///
    /// ```text
    /// -- pwlinear_scheduled_param
    ///      10.0000 |                    **********
    ///              |                  **
    ///       0.0000 |**********
    ///              +------------------------------
    ///                0                          29
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TextChart {
        pub width: usize,
        pub height: usize,
    }

    impl Default for TextChart {
        fn default() -> Self {
            Self {
                width: 60,
                height: 12,
            }
        }
    }

    impl Chart for TextChart {
        type Output = String;

        fn render(&self, label: &str, points: &[(usize, f64)]) -> String {
            let mut out = format!("-- {label}\n");
            if points.is_empty() {
                out.push_str(&format!("{} (no values)\n", " ".repeat(AXIS)));
                return out;
            }

            let width = self.width.clamp(1, points.len());
            let height = self.height.max(2);
            let (min, max) = points
                .iter()
                .map(|&(_, v)| v)
                .filter(|v| v.is_finite())
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                    (lo.min(v), hi.max(v))
                });

            let mut grid = vec![vec![' '; width]; height];
            for col in 0..width {
                let (_, v) = points[col * points.len() / width];
                if !v.is_finite() {
                    continue;
                }
                let row = if max > min {
                    ((max - v) / (max - min) * (height - 1) as f64).round() as usize
                } else {
                    (height - 1) / 2
                };
                grid[row.min(height - 1)][col] = '*';
            }

            for (r, row) in grid.iter().enumerate() {
                let axis = if r == 0 {
                    format!("{max:>width$.4}", width = AXIS)
                } else if r == height - 1 {
                    format!("{min:>width$.4}", width = AXIS)
                } else {
                    " ".repeat(AXIS)
                };
                let line: String = row.iter().collect();
                out.push_str(&format!("{axis} |{}\n", line.trim_end()));
            }
            out.push_str(&format!("{} +{}\n", " ".repeat(AXIS), "-".repeat(width)));

            let first = points[0].0.to_string();
            let last = points[points.len() - 1].0.to_string();
            let gap = width.saturating_sub(first.len() + last.len()).max(1);
            out.push_str(&format!(
                "{}  {first}{}{last}\n",
                " ".repeat(AXIS),
                " ".repeat(gap)
            ));
            out
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn renders_extremes_on_first_and_last_rows() {
            let points: Vec<(usize, f64)> = (0..10).map(|i| (i, i as f64)).collect();
            let chart = TextChart {
                width: 10,
                height: 5,
            };
            let out = chart.render("ramp", &points);
            let lines: Vec<&str> = out.lines().collect();

            assert_eq!(lines[0], "-- ramp");
            assert!(lines[1].trim_start().starts_with("9.0000 |"));
            assert!(lines[1].ends_with('*'));
            assert!(lines[5].trim_start().starts_with("0.0000 |*"));
            assert_eq!(lines.len(), 1 + 5 + 2);
            assert!(lines[7].trim_end().ends_with('9'));
        }

        #[test]
        fn samples_down_to_width() {
            let points: Vec<(usize, f64)> = (0..100).map(|i| (i, (i % 2) as f64)).collect();
            let chart = TextChart {
                width: 20,
                height: 3,
            };
            let out = chart.render("saw", &points);
            let stars = out.chars().filter(|&c| c == '*').count();
            assert_eq!(stars, 20);
        }

        #[test]
        fn constant_series_sits_mid_chart() {
            let points = [(0, 4.0), (1, 4.0), (2, 4.0)];
            let chart = TextChart {
                width: 3,
                height: 5,
            };
            let out = chart.render("flat", &points);
            let lines: Vec<&str> = out.lines().collect();
            assert!(lines[3].ends_with("|***"));
        }

        #[test]
        fn empty_series() {
            let out = TextChart::default().render("none", &[]);
            assert!(out.contains("(no values)"));
        }
    }
}
