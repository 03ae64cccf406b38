//! Pawdiary demo
//!
//! Runs a day in the diary against a scripted location provider and prints
//! the derived views.

use chrono::{Duration, Local, NaiveDateTime};
use pawdiary::index::YearMonth;
use pawdiary::profile::{Gender, NewPlace, NewVaccination, PlaceKind, VaccineKind};
use pawdiary::storage::{Clock, ManualClock};
use pawdiary::walk::{Fix, Location, ScriptedLocation};
use pawdiary::{Condition, Config, Diary, DiaryResult, NewRecord, Profile, ToiletKind};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    config.logging.init();

    tracing::info!("Pawdiary v{}", env!("CARGO_PKG_VERSION"));

    let morning = Local::now()
        .date_naive()
        .and_hms_opt(7, 0, 0)
        .unwrap_or_else(|| Local::now().naive_local());
    let clock = Arc::new(ManualClock::new(morning));

    let home = Location::new(35.6595, 139.7005);
    let park = Location::new(35.6717, 139.6949);
    let location = ScriptedLocation::new()
        .with_fix(Fix::new(home, morning + Duration::minutes(30)))
        .with_fix(Fix::new(park, morning + Duration::minutes(62)));

    let profile = Profile::new("ポチ")
        .breed("柴犬")
        .gender(Gender::Male);

    let diary = Diary::with_clock(config, profile, Arc::new(location), clock.clone());

    demo_day(&diary, &clock).await?;
    demo_profile(&diary, clock.now()).await?;
    demo_views(&diary).await;

    tracing::info!("Pawdiary demo complete");
    Ok(())
}

async fn demo_day(diary: &Diary, clock: &ManualClock) -> DiaryResult<()> {
    tracing::info!("Logging a day...");

    diary
        .log(NewRecord::toilet(ToiletKind::Pee, Some(Condition::Good)))
        .await?;

    clock.advance(Duration::minutes(10));
    diary.log(NewRecord::food("ドライフード").memo("完食")).await?;

    clock.advance(Duration::minutes(20));
    let start = diary.start_walk().await?;
    tracing::info!("Walk started at {}", start.location);

    clock.advance(Duration::minutes(32));
    let walk = diary.finish_walk().await?;
    tracing::info!("Walk finished: {}", walk.sub_type());

    clock.advance(Duration::minutes(5));
    diary
        .log(NewRecord::toilet(ToiletKind::Poop, Some(Condition::Normal)))
        .await?;

    for (days_ago, kg) in [(14, 5.0), (7, 5.1), (0, 5.2)] {
        let day = diary.today() - Duration::days(days_ago);
        diary.log(NewRecord::weight(kg).on_day(day)).await?;
    }

    Ok(())
}

async fn demo_profile(diary: &Diary, now: NaiveDateTime) -> DiaryResult<()> {
    let today = now.date();
    diary
        .add_vaccination(
            NewVaccination::new(VaccineKind::Rabies, today - Duration::days(180))
                .next_date(today + Duration::days(185)),
        )
        .await;
    diary
        .add_place(NewPlace::new(PlaceKind::Hospital, "○○動物病院").phone("03-1234-5678"))
        .await?;

    let profile = diary
        .update_profile(|p| {
            p.add_food_type("ささみ");
        })
        .await?;

    for vaccination in profile.upcoming_vaccinations(today) {
        if let Some(next) = vaccination.next_date {
            tracing::info!(
                "Next {}: {}",
                vaccination.kind.label(),
                diary.format_date(next)
            );
        }
    }
    Ok(())
}

async fn demo_views(diary: &Diary) {
    println!("Recent:");
    for record in diary.recent().await {
        println!(
            "  {}  {}",
            diary.format_timestamp(record.timestamp),
            record.summary()
        );
    }

    let grid = diary.calendar_month(YearMonth::of(diary.today())).await;
    if let Some(today) = grid.days().find(|d| d.is_today) {
        println!(
            "{} {}: {} records, {} markers",
            grid.month,
            today.day,
            today.record_count,
            today.markers.len()
        );
    }

    let series = diary.weight_series().await;
    if let (Some(latest), Some((lo, hi))) = (series.latest(), series.range()) {
        println!(
            "Weight: {:.1} kg (range {:.1}-{:.1})",
            latest.weight.unwrap_or_default(),
            lo,
            hi
        );
    }

    for walk in diary.walks().await {
        if let Some(url) = diary.walk_map_url(&walk) {
            println!("Walk {}: {}", walk.sub_type(), url);
        }
    }
}
