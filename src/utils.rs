use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;

pub static RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build Tokio runtime")
});

/// Run `fut` on the shared tokio runtime and await its output from any
/// executor. A panicked task surfaces as `Err`.
pub async fn run_on_runtime<T, Fut>(fut: Fut) -> Result<T, String>
where
    T: Send + 'static,
    Fut: std::future::Future<Output = T> + Send + 'static,
{
    RUNTIME.spawn(fut).await.map_err(|e| e.to_string())
}

pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else if trimmed.starts_with("localhost") || trimmed.starts_with("127.0.0.1") {
        format!("http://{}", trimmed)
    } else {
        format!("https://{}", trimmed)
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// ISO-8601 calendar date, the format the date field and backend use.
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_url_adds_scheme() {
        assert_eq!(normalize_url(" queues.example.com/ "), "https://queues.example.com");
        assert_eq!(normalize_url("localhost:8080"), "http://localhost:8080");
        assert_eq!(normalize_url("http://10.0.0.2:8080"), "http://10.0.0.2:8080");
    }

    #[test]
    fn iso_date_is_zero_padded() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(iso_date(d), "2026-03-07");
    }

    #[test]
    fn runtime_hop_returns_output() {
        let out = block_on(run_on_runtime(async { 40 + 2 }));
        assert_eq!(out, Ok(42));
    }

    fn block_on<F: std::future::Future>(fut: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(fut)
    }
}
