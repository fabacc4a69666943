mod common;

use pretty_assertions::assert_eq;
use salonbook_core::{
    availability::available_starts,
    calendar::{start_of_day, BookingPolicy, DateWindow},
    errors::BookingError,
    models::{
        booking::{BookingStatus, ReserveRequest},
        review::CreateReviewRequest,
        schedule::DaySchedule,
        service::UpdateServiceRequest,
        time_slot::SlotStatus,
    },
};
use salonbook_db::{engine, repositories::time_slot, slot_catalog::PgSlotCatalog, DbPool};
use std::time::Duration;
use uuid::Uuid;

use common::{at, create_test_pool, service, test_day, working_staff};

fn request(staff_id: Uuid, service_id: Uuid, hour: u32, minute: u32, client: &str) -> ReserveRequest {
    ReserveRequest {
        staff_id,
        service_id,
        start_time: at(hour, minute),
        client_external_id: client.to_string(),
    }
}

fn whole_test_day() -> DateWindow {
    DateWindow {
        from: start_of_day(test_day()),
        to: start_of_day(test_day() + chrono::Duration::days(1)),
    }
}

async fn statuses(pool: &DbPool, staff_id: Uuid, from: (u32, u32), count: usize) -> Vec<SlotStatus> {
    let slots = engine::schedule::staff_schedule(pool, staff_id, test_day(), test_day())
        .await
        .unwrap();
    slots
        .into_iter()
        .skip_while(|s| s.start_time < at(from.0, from.1))
        .take(count)
        .map(|s| s.status)
        .collect()
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
async fn test_schedule_writes_gapless_business_day() {
    let pool = create_test_pool().await;
    let svc = service(&pool, 30).await;
    let staff = working_staff(&pool, &svc, &[10, 11]).await;

    let slots = engine::schedule::staff_schedule(&pool, staff.id, test_day(), test_day())
        .await
        .unwrap();

    assert_eq!(slots.len(), 40);
    assert_eq!(slots.iter().filter(|s| s.is_free()).count(), 8);
    assert_eq!(slots[0].start_time, at(9, 0));
    assert_eq!(slots[39].start_time, at(18, 45));
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
async fn test_concurrent_reservations_on_overlapping_runs() {
    let pool = create_test_pool().await;
    let svc = service(&pool, 30).await;
    let staff = working_staff(&pool, &svc, &[10]).await;

    let first = request(staff.id, svc.id, 10, 0, "client-a");
    let second = request(staff.id, svc.id, 10, 15, "client-b");
    let (a, b) = tokio::join!(
        engine::reservation::reserve(&pool, &first),
        engine::reservation::reserve(&pool, &second),
    );

    let winners = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(winners, 1);
    let loser = if a.is_ok() { b } else { a };
    assert!(matches!(loser, Err(BookingError::SlotConflict(_))));
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
async fn test_reserve_then_cancel_restores_availability() {
    let pool = create_test_pool().await;
    let catalog = PgSlotCatalog::new(pool.clone());
    let svc = service(&pool, 30).await;
    let staff = working_staff(&pool, &svc, &[10]).await;

    let before = available_starts(&catalog, svc.id, Some(staff.id), &whole_test_day())
        .await
        .unwrap();

    let booking = engine::reservation::reserve(&pool, &request(staff.id, svc.id, 10, 0, "client-a"))
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Scheduled);
    assert_eq!(
        statuses(&pool, staff.id, (10, 0), 2).await,
        vec![SlotStatus::Booked, SlotStatus::Booked]
    );

    engine::reservation::cancel(&pool, booking.id).await.unwrap();

    let after = available_starts(&catalog, svc.id, Some(staff.id), &whole_test_day())
        .await
        .unwrap();
    assert_eq!(before, after);
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
async fn test_cancel_twice_is_a_no_op() {
    let pool = create_test_pool().await;
    let svc = service(&pool, 15).await;
    let staff = working_staff(&pool, &svc, &[10]).await;

    let booking = engine::reservation::reserve(&pool, &request(staff.id, svc.id, 10, 0, "client-a"))
        .await
        .unwrap();
    engine::reservation::cancel(&pool, booking.id).await.unwrap();
    // Someone else takes the freed slot; a repeated cancel must not free it.
    engine::reservation::reserve(&pool, &request(staff.id, svc.id, 10, 0, "client-b"))
        .await
        .unwrap();

    engine::reservation::cancel(&pool, booking.id).await.unwrap();

    assert_eq!(statuses(&pool, staff.id, (10, 0), 1).await, vec![SlotStatus::Booked]);
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
async fn test_failed_reservation_changes_nothing() {
    let pool = create_test_pool().await;
    let svc = service(&pool, 45).await;
    // 10:00..11:00 free, 11:00 onwards blocked: a 45-minute run at 10:30
    // would need 11:00.
    let staff = working_staff(&pool, &svc, &[10]).await;

    let err = engine::reservation::reserve(&pool, &request(staff.id, svc.id, 10, 30, "client-a"))
        .await
        .unwrap_err();

    assert!(matches!(err, BookingError::SlotConflict(_)));
    assert_eq!(
        statuses(&pool, staff.id, (10, 30), 2).await,
        vec![SlotStatus::Free, SlotStatus::Free]
    );
    assert!(engine::history::bookings_for_client(&pool, "client-a")
        .await
        .unwrap()
        .iter()
        .all(|b| b.staff_id != staff.id));
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
async fn test_reserving_same_anchor_twice_conflicts() {
    let pool = create_test_pool().await;
    let svc = service(&pool, 30).await;
    let staff = working_staff(&pool, &svc, &[10]).await;
    let same = request(staff.id, svc.id, 10, 0, "client-a");

    engine::reservation::reserve(&pool, &same).await.unwrap();
    let err = engine::reservation::reserve(&pool, &same).await.unwrap_err();

    assert!(matches!(err, BookingError::SlotConflict(_)));
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
async fn test_reserve_rejects_staff_not_offering_service() {
    let pool = create_test_pool().await;
    let offered = service(&pool, 30).await;
    let other = service(&pool, 30).await;
    let staff = working_staff(&pool, &offered, &[10]).await;

    let err = engine::reservation::reserve(&pool, &request(staff.id, other.id, 10, 0, "client-a"))
        .await
        .unwrap_err();

    assert!(matches!(err, BookingError::InvalidInput(_)));
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
async fn test_regenerating_schedule_keeps_booked_runs() {
    let pool = create_test_pool().await;
    let svc = service(&pool, 30).await;
    let staff = working_staff(&pool, &svc, &[10, 11]).await;
    let booking = engine::reservation::reserve(&pool, &request(staff.id, svc.id, 10, 0, "client-a"))
        .await
        .unwrap();

    // The staff member now only works at 11; the 10:00 booking stays.
    engine::schedule::define_schedule(
        &pool,
        staff.id,
        &[DaySchedule {
            date: test_day(),
            working_hours: vec![11],
        }],
        &BookingPolicy::default(),
    )
    .await
    .unwrap();

    let slots = engine::schedule::staff_schedule(&pool, staff.id, test_day(), test_day())
        .await
        .unwrap();
    assert_eq!(slots.len(), 40);
    assert_eq!(
        statuses(&pool, staff.id, (10, 0), 4).await,
        vec![SlotStatus::Booked; 4]
    );
    assert!(slots.iter().any(|s| s.id == booking.anchor_slot_id));

    engine::reservation::cancel(&pool, booking.id).await.unwrap();
    assert_eq!(
        statuses(&pool, staff.id, (10, 0), 2).await,
        vec![SlotStatus::Free, SlotStatus::Free]
    );
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
async fn test_service_duration_is_frozen_while_booked() {
    let pool = create_test_pool().await;
    let svc = service(&pool, 30).await;
    let staff = working_staff(&pool, &svc, &[10]).await;
    engine::reservation::reserve(&pool, &request(staff.id, svc.id, 10, 0, "client-a"))
        .await
        .unwrap();

    let err = engine::catalog::update_service(
        &pool,
        svc.id,
        &UpdateServiceRequest {
            duration_minutes: Some(60),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BookingError::InvalidInput(_)));

    let renamed = engine::catalog::update_service(
        &pool,
        svc.id,
        &UpdateServiceRequest {
            name: Some("Long haircut".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(renamed.name, "Long haircut");
    assert_eq!(renamed.duration_minutes, 30);
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
async fn test_duration_change_waits_for_inflight_reservation() {
    let pool = create_test_pool().await;
    let svc = service(&pool, 30).await;
    let staff = working_staff(&pool, &svc, &[10]).await;

    // Hold the run's slot rows so the reservation stalls after reading the service.
    let mut holder = pool.begin().await.unwrap();
    time_slot::lock_slots_in_range(&mut *holder, staff.id, at(10, 0), at(10, 30))
        .await
        .unwrap();

    let reserve = tokio::spawn({
        let pool = pool.clone();
        let req = request(staff.id, svc.id, 10, 0, "client-a");
        async move { engine::reservation::reserve(&pool, &req).await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut update = tokio::spawn({
        let pool = pool.clone();
        async move {
            engine::catalog::update_service(
                &pool,
                svc.id,
                &UpdateServiceRequest {
                    duration_minutes: Some(60),
                    ..Default::default()
                },
            )
            .await
        }
    });
    assert!(
        tokio::time::timeout(Duration::from_millis(200), &mut update)
            .await
            .is_err(),
        "duration change must wait for the reservation reading the old duration"
    );

    holder.rollback().await.unwrap();

    let booking = reserve.await.unwrap().unwrap();
    let err = update.await.unwrap().unwrap_err();
    assert!(matches!(err, BookingError::InvalidInput(_)));
    assert_eq!(
        engine::catalog::get_service(&pool, svc.id)
            .await
            .unwrap()
            .duration_minutes,
        30
    );

    engine::reservation::cancel(&pool, booking.id).await.unwrap();
    assert_eq!(statuses(&pool, staff.id, (10, 0), 4).await, vec![SlotStatus::Free; 4]);
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
async fn test_reviews_maintain_staff_rating() {
    let pool = create_test_pool().await;
    let svc = service(&pool, 15).await;
    let staff = working_staff(&pool, &svc, &[10]).await;
    let client = format!("client-{}", Uuid::new_v4());

    let first = engine::reservation::reserve(&pool, &request(staff.id, svc.id, 10, 0, &client))
        .await
        .unwrap();
    let second = engine::reservation::reserve(&pool, &request(staff.id, svc.id, 10, 15, &client))
        .await
        .unwrap();

    let review_first = CreateReviewRequest {
        booking_id: first.id,
        client_external_id: client.clone(),
        rating: 5,
        text: "Great".to_string(),
    };
    let err = engine::reviews::create_review(&pool, &review_first).await.unwrap_err();
    assert!(matches!(err, BookingError::InvalidInput(_)), "scheduled bookings are not reviewable");

    engine::reservation::complete(&pool, first.id).await.unwrap();
    engine::reservation::complete(&pool, second.id).await.unwrap();

    engine::reviews::create_review(&pool, &review_first).await.unwrap();
    let duplicate = engine::reviews::create_review(&pool, &review_first).await.unwrap_err();
    assert!(matches!(duplicate, BookingError::InvalidInput(_)));

    let stranger = CreateReviewRequest {
        booking_id: second.id,
        client_external_id: "someone-else".to_string(),
        rating: 1,
        text: String::new(),
    };
    let err = engine::reviews::create_review(&pool, &stranger).await.unwrap_err();
    assert!(matches!(err, BookingError::InvalidInput(_)));

    let low = engine::reviews::create_review(
        &pool,
        &CreateReviewRequest {
            booking_id: second.id,
            client_external_id: client.clone(),
            rating: 2,
            text: String::new(),
        },
    )
    .await
    .unwrap();

    let rated = engine::catalog::get_staff(&pool, staff.id).await.unwrap();
    assert_eq!((rated.total_rating, rated.num_reviews), (7, 2));
    assert_eq!(rated.rating(), Some(3.5));

    engine::reviews::delete_review(&pool, low.id).await.unwrap();
    let rated = engine::catalog::get_staff(&pool, staff.id).await.unwrap();
    assert_eq!((rated.total_rating, rated.num_reviews), (5, 1));
    assert_eq!(engine::reviews::list_reviews(&pool, staff.id).await.unwrap().len(), 1);
}

#[test_log::test(tokio::test)]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
async fn test_completed_booking_cannot_be_cancelled() {
    let pool = create_test_pool().await;
    let svc = service(&pool, 15).await;
    let staff = working_staff(&pool, &svc, &[10]).await;
    let booking = engine::reservation::reserve(&pool, &request(staff.id, svc.id, 10, 0, "client-a"))
        .await
        .unwrap();

    engine::reservation::complete(&pool, booking.id).await.unwrap();
    let err = engine::reservation::cancel(&pool, booking.id).await.unwrap_err();

    assert!(matches!(err, BookingError::InvalidInput(_)));
    let history = engine::history::bookings_for_staff(&pool, staff.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, BookingStatus::Completed);
    assert_eq!(history[0].start_time, Some(at(10, 0)));
}
