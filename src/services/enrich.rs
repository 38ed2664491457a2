use std::time::Duration;

use tokio::task::JoinSet;

use crate::models::{EnrichedMovie, MovieRecord};
use crate::services::providers::PosterProvider;

/// Bounded-concurrency batch enricher.
///
/// Maps movie records to poster-enriched records with at most `concurrency`
/// lookups in flight; completion of any lookup immediately frees a slot for
/// the next queued record. Each lookup is bounded by `timeout`, and a failed
/// or timed-out lookup yields an empty poster rather than failing the batch.
pub struct Enricher {
    concurrency: usize,
    timeout: Duration,
}

impl Enricher {
    pub fn new(concurrency: usize, timeout: Duration) -> Self {
        Self {
            concurrency: concurrency.max(1),
            timeout,
        }
    }

    /// Runs poster lookups for all records.
    ///
    /// Output is in completion order, not input order; callers sort on a
    /// stable key before display. Always returns exactly one enriched
    /// record per input record.
    pub async fn enrich(
        &self,
        records: Vec<MovieRecord>,
        provider: &dyn PosterProvider,
    ) -> Vec<EnrichedMovie> {
        let total = records.len();
        if total == 0 {
            return Vec::new();
        }

        tracing::info!(
            records = total,
            concurrency = self.concurrency,
            timeout_ms = self.timeout.as_millis() as u64,
            provider = provider.name(),
            "Enriching movie records"
        );

        let mut join_set = JoinSet::new();
        let mut next_idx = 0usize;
        let mut enriched = Vec::with_capacity(total);
        let mut settled = vec![false; total];
        let mut missing = 0usize;

        while next_idx < total || !join_set.is_empty() {
            while next_idx < total && join_set.len() < self.concurrency {
                let record = records[next_idx].clone();
                let provider = provider.clone_for_task();
                let timeout = self.timeout;
                let idx = next_idx;

                join_set.spawn(async move {
                    let outcome =
                        tokio::time::timeout(timeout, provider.lookup_poster(&record.title, &record.year))
                            .await;

                    let poster = match outcome {
                        Ok(Ok(info)) => info.url.unwrap_or_default(),
                        Ok(Err(err)) => {
                            tracing::warn!(
                                title = %record.title,
                                year = %record.year,
                                error = %err,
                                "Poster lookup failed"
                            );
                            String::new()
                        }
                        Err(_) => {
                            tracing::warn!(
                                title = %record.title,
                                year = %record.year,
                                timeout_ms = timeout.as_millis() as u64,
                                "Poster lookup timed out"
                            );
                            String::new()
                        }
                    };

                    (idx, EnrichedMovie { movie: record, poster })
                });

                next_idx += 1;
            }

            let Some(joined) = join_set.join_next().await else {
                break;
            };
            match joined {
                Ok((idx, movie)) => {
                    if movie.poster.is_empty() {
                        missing += 1;
                    }
                    settled[idx] = true;
                    enriched.push(movie);
                }
                Err(err) => {
                    tracing::error!(error = %err, "Poster lookup task panicked");
                }
            }
        }

        // A panicked task still owes its record an output slot.
        for (idx, settled) in settled.into_iter().enumerate() {
            if !settled {
                missing += 1;
                enriched.push(EnrichedMovie {
                    movie: records[idx].clone(),
                    poster: String::new(),
                });
            }
        }

        tracing::info!(
            enriched = enriched.len(),
            missing_posters = missing,
            "Enrichment complete"
        );

        enriched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult};
    use crate::models::PosterInfo;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone)]
    enum Lookup {
        Poster(&'static str),
        NoArtwork,
        Fails,
        Hangs,
    }

    /// Instrumented provider: tracks concurrent entries and the high-water
    /// mark so tests can assert the concurrency cap.
    #[derive(Clone)]
    struct StubProvider {
        lookups: Arc<HashMap<String, Lookup>>,
        default: Lookup,
        delay: Duration,
        calls: Arc<AtomicUsize>,
        in_flight: Arc<AtomicUsize>,
        max_in_flight: Arc<AtomicUsize>,
    }

    impl StubProvider {
        fn new(default: Lookup, delay: Duration) -> Self {
            Self {
                lookups: Arc::new(HashMap::new()),
                default,
                delay,
                calls: Arc::new(AtomicUsize::new(0)),
                in_flight: Arc::new(AtomicUsize::new(0)),
                max_in_flight: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn with_lookups(lookups: HashMap<String, Lookup>, delay: Duration) -> Self {
            Self {
                lookups: Arc::new(lookups),
                ..Self::new(Lookup::NoArtwork, delay)
            }
        }
    }

    #[async_trait::async_trait]
    impl PosterProvider for StubProvider {
        async fn lookup_poster(&self, title: &str, _year: &str) -> AppResult<PosterInfo> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(running, Ordering::SeqCst);

            let lookup = self.lookups.get(title).unwrap_or(&self.default).clone();
            let result = match lookup {
                Lookup::Hangs => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
                Lookup::Poster(url) => {
                    tokio::time::sleep(self.delay).await;
                    Ok(PosterInfo {
                        url: Some(url.to_string()),
                    })
                }
                Lookup::NoArtwork => {
                    tokio::time::sleep(self.delay).await;
                    Ok(PosterInfo { url: None })
                }
                Lookup::Fails => {
                    tokio::time::sleep(self.delay).await;
                    Err(AppError::ExternalApi("stub failure".to_string()))
                }
            };

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }

        fn clone_for_task(&self) -> Box<dyn PosterProvider> {
            Box::new(self.clone())
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    fn record(title: &str, year: &str) -> MovieRecord {
        MovieRecord {
            title: title.to_string(),
            year: year.to_string(),
            rating: None,
            runtime: 100,
            stars: 7,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_exceeds_concurrency_cap() {
        let provider = StubProvider::new(Lookup::Poster("/poster.jpg"), Duration::from_millis(10));
        let records: Vec<MovieRecord> = (0..20)
            .map(|i| record(&format!("Movie {}", i), "2000"))
            .collect();

        let enricher = Enricher::new(3, Duration::from_millis(500));
        let enriched = enricher.enrich(records, &provider).await;

        assert_eq!(enriched.len(), 20);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 20);
        assert!(provider.max_in_flight.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_still_yield_one_output_per_input() {
        let mut lookups = HashMap::new();
        lookups.insert("Good".to_string(), Lookup::Poster("/good.jpg"));
        lookups.insert("Bad".to_string(), Lookup::Fails);
        lookups.insert("Bare".to_string(), Lookup::NoArtwork);
        let provider = StubProvider::with_lookups(lookups, Duration::from_millis(5));

        let records = vec![
            record("Good", "2001"),
            record("Bad", "2002"),
            record("Bare", "2003"),
        ];

        let enricher = Enricher::new(2, Duration::from_millis(500));
        let enriched = enricher.enrich(records, &provider).await;

        assert_eq!(enriched.len(), 3);
        let poster_of = |title: &str| {
            enriched
                .iter()
                .find(|m| m.movie.title == title)
                .map(|m| m.poster.clone())
                .unwrap()
        };
        assert_eq!(poster_of("Good"), "/good.jpg");
        assert_eq!(poster_of("Bad"), "");
        assert_eq!(poster_of("Bare"), "");
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let provider = StubProvider::new(Lookup::Poster("/poster.jpg"), Duration::from_millis(1));
        let enricher = Enricher::new(5, Duration::from_millis(100));

        let enriched = enricher.enrich(Vec::new(), &provider).await;

        assert!(enriched.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_lookup_gets_empty_poster() {
        let mut lookups = HashMap::new();
        lookups.insert("Elf".to_string(), Lookup::Poster("/elf.jpg"));
        lookups.insert("Die Hard".to_string(), Lookup::Hangs);
        let provider = StubProvider::with_lookups(lookups, Duration::from_millis(100));

        let records = vec![record("Elf", "2003"), record("Die Hard", "1988")];

        let enricher = Enricher::new(5, Duration::from_millis(1500));
        let enriched = enricher.enrich(records, &provider).await;

        assert_eq!(enriched.len(), 2);
        let elf = enriched.iter().find(|m| m.movie.title == "Elf").unwrap();
        let die_hard = enriched
            .iter()
            .find(|m| m.movie.title == "Die Hard")
            .unwrap();
        assert_eq!(elf.poster, "/elf.jpg");
        assert_eq!(die_hard.poster, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_slot_frees_as_soon_as_any_lookup_settles() {
        // One hanging lookup must not block the remaining records behind it
        // the way fixed-batch chunking would.
        let mut lookups = HashMap::new();
        lookups.insert("Stuck".to_string(), Lookup::Hangs);
        let provider = StubProvider::with_lookups(lookups, Duration::from_millis(5));

        let mut records = vec![record("Stuck", "1999")];
        records.extend((0..10).map(|i| record(&format!("Quick {}", i), "2000")));

        let enricher = Enricher::new(2, Duration::from_millis(200));
        let enriched = enricher.enrich(records, &provider).await;

        assert_eq!(enriched.len(), 11);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 11);
        // The hanging lookup settles last (via timeout), after every quick one.
        assert_eq!(enriched.last().unwrap().movie.title, "Stuck");
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_of_one_serializes_lookups() {
        let provider = StubProvider::new(Lookup::Poster("/poster.jpg"), Duration::from_millis(10));
        let records: Vec<MovieRecord> = (0..5)
            .map(|i| record(&format!("Movie {}", i), "2000"))
            .collect();

        let enricher = Enricher::new(1, Duration::from_millis(500));
        let enriched = enricher.enrich(records, &provider).await;

        assert_eq!(enriched.len(), 5);
        assert_eq!(provider.max_in_flight.load(Ordering::SeqCst), 1);
    }
}
