//! HTML pages.

use chrono::NaiveDate;
use weather_core::{CurrentWeather, DisplayUnits, HistoricalWeather, date};

const STYLE: &str = r#"
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
           max-width: 720px; margin: 0 auto; padding: 20px; background: #f5f5f5; color: #333; }
    h1 { border-bottom: 3px solid #4d96ff; padding-bottom: 10px; }
    form, .card { background: white; border-radius: 8px; padding: 16px; margin-bottom: 20px; }
    label { display: block; margin: 8px 0 4px; }
    .error { border-left: 4px solid #ff6b6b; }
    img { max-width: 100%; }
"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{title}</title>
    <meta charset="utf-8">
    <style>{STYLE}</style>
</head>
<body>
{body}
<p><a href="/">Back to search</a></p>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn units_select() -> &'static str {
    r#"<label for="units">Units</label>
        <select name="units" id="units">
            <option value="metric">Celsius</option>
            <option value="imperial">Fahrenheit</option>
            <option value="kelvin">Kelvin</option>
        </select>"#
}

pub fn home_page(today: NaiveDate) -> String {
    let (min_date, max_date) = date::history_window(today);
    let min_date = date::format_date(min_date);
    let max_date = date::format_date(max_date);
    let units = units_select();

    let body = format!(
        r#"<h1>Weather</h1>
<form action="/results" method="get">
    <h2>Current weather</h2>
    <label for="city">City</label>
    <input type="text" name="city" id="city" required>
    {units}
    <button type="submit">Get weather</button>
</form>
<form action="/historical_results" method="get">
    <h2>Historical weather</h2>
    <label for="hist-city">City</label>
    <input type="text" name="city" id="hist-city" required>
    <label for="date">Date</label>
    <input type="date" name="date" id="date" min="{min_date}" max="{max_date}" value="{max_date}" required>
    {units}
    <button type="submit">Get history</button>
</form>"#
    );

    layout("Weather", &body)
}

pub fn results_page(weather: &CurrentWeather, units: DisplayUnits, today: NaiveDate) -> String {
    let body = format!(
        r#"<h1>{city}</h1>
<div class="card">
    <p>{today}</p>
    <p><strong>{temp:.1}&deg;{letter}</strong>, {description}</p>
    <p>Humidity: {humidity}%</p>
    <p>Wind speed: {wind:.1} {wind_unit}</p>
    <p>Sunrise: {sunrise}</p>
    <p>Sunset: {sunset}</p>
</div>"#,
        city = escape(&weather.city),
        today = today.format("%A, %B %d, %Y"),
        temp = weather.temperature,
        letter = units.temperature,
        description = escape(&weather.description),
        humidity = weather.humidity,
        wind = weather.wind_speed,
        wind_unit = units.wind,
        sunrise = weather.sunrise.format("%-I:%M %p"),
        sunset = weather.sunset.format("%-I:%M %p"),
    );

    layout(&format!("Weather in {}", weather.city), &body)
}

pub fn historical_page(weather: &HistoricalWeather, units_token: &str, units: DisplayUnits) -> String {
    let date_str = date::format_date(weather.date);
    let graph_src = format!(
        "/graph/{}/{}/{}/{}",
        weather.point.latitude,
        weather.point.longitude,
        urlencoding::encode(units_token),
        date_str,
    );

    let body = format!(
        r#"<h1>{location}</h1>
<div class="card">
    <p>{date} &middot; {lat:.4}, {lon:.4}</p>
    <p><strong>{temp:.1}&deg;{letter}</strong>, {description}</p>
    <p>Low: {min:.1}&deg;{letter}</p>
    <p>High: {max:.1}&deg;{letter}</p>
</div>
<div class="card">
    <img src="{graph_src}" alt="Hourly temperature on {date}">
</div>"#,
        location = escape(&weather.location),
        date = weather.date.format("%A, %B %d, %Y"),
        lat = weather.point.latitude,
        lon = weather.point.longitude,
        temp = weather.temperature,
        letter = units.temperature,
        description = escape(&weather.description),
        min = weather.min_temp,
        max = weather.max_temp,
        graph_src = escape(&graph_src),
    );

    layout(&format!("{} on {}", weather.location, date_str), &body)
}

/// The one page every upstream failure ends up on.
pub fn error_page(city: &str) -> String {
    let body = format!(
        r#"<h1>Something went wrong</h1>
<div class="card error">
    <p>Sorry, we could not retrieve data for {city}. Check the spelling or try again later.</p>
</div>"#,
        city = escape(city),
    );
    layout("Weather unavailable", &body)
}

pub fn bad_request_page(message: &str) -> String {
    let body = format!(
        r#"<h1>Bad request</h1>
<div class="card error">
    <p>{message}</p>
</div>"#,
        message = escape(message),
    );
    layout("Bad request", &body)
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::{GeoPoint, HourlySample};

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<b>"Tom" & 'Jerry'</b>"#), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
    }

    #[test]
    fn error_page_escapes_city() {
        let html = error_page("<script>");
        assert!(html.contains("could not retrieve data for &lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn home_page_bounds_date_picker() {
        let html = home_page(NaiveDate::from_ymd_opt(2020, 12, 2).unwrap());
        assert!(html.contains(r#"min="2020-11-27""#));
        assert!(html.contains(r#"max="2020-12-02""#));
    }

    #[test]
    fn historical_page_links_chart() {
        let weather = HistoricalWeather {
            location: "Oakland".into(),
            date: NaiveDate::from_ymd_opt(2020, 8, 26).unwrap(),
            point: GeoPoint::new(37.8, -122.27),
            temperature: 17.0,
            description: "haze".into(),
            min_temp: 10.0,
            max_temp: 25.0,
            hourly: vec![HourlySample { temperature: 10.0 }, HourlySample { temperature: 25.0 }],
        };

        let html = historical_page(&weather, "metric", DisplayUnits::resolve("metric"));
        assert!(html.contains(r#"src="/graph/37.8/-122.27/metric/2020-08-26""#), "{html}");
        assert!(html.contains("Low: 10.0&deg;C"));
        assert!(html.contains("High: 25.0&deg;C"));

        let html = historical_page(&weather, "a/b c", DisplayUnits::resolve("a/b c"));
        assert!(html.contains(r#"src="/graph/37.8/-122.27/a%2Fb%20c/2020-08-26""#), "{html}");
    }
}
