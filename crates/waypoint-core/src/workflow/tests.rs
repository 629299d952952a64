use std::sync::Arc;

use jiff::Timestamp;
use proptest::prelude::*;

use super::*;
use crate::{
    error::WorkflowError,
    models::{
        CheckInSlot, DeliveryStatus, EncodedImage, IncidentType, Job, JobStatus, PhotoSlot,
        PickupSlot, StepKind, TransportType,
    },
    services::{
        fakes::{blurry_frame, sharp_frame, FakeLocation, MemoryStore, ScriptedCamera},
        BlurDecision, Clock, FixedClock, NoLocation,
    },
};

fn instant() -> Timestamp {
    "2024-03-01T08:30:00Z".parse().unwrap()
}

fn job(id: u64) -> Job {
    Job {
        id,
        transport: TransportType::LongHaul,
        route: "Bangkok DC → Chiang Mai Hub".to_string(),
        pickup_location: "Bangkok DC".to_string(),
        status: JobStatus::Pending,
        scheduled_at: instant(),
        created_at: instant(),
        updated_at: instant(),
    }
}

fn image() -> EncodedImage {
    EncodedImage::new("image/jpeg", vec![0xFF, 0xD8, 0xFF])
}

struct Harness {
    workflow: Workflow,
    location: FakeLocation,
    store: MemoryStore,
}

fn harness() -> Harness {
    harness_with(FakeLocation::at("12 Rama IV Rd, Bangkok"))
}

fn harness_with(location: FakeLocation) -> Harness {
    let store = MemoryStore::new();
    let workflow = WorkflowBuilder::new(Arc::new(store.clone()))
        .with_clock(Arc::new(FixedClock::utc(instant())))
        .with_location(Arc::new(location.clone()))
        .build()
        .unwrap();
    Harness {
        workflow,
        location,
        store,
    }
}

async fn fill_current(workflow: &Workflow) {
    let kind = workflow.snapshot().await.current_kind();
    for slot in PhotoSlot::for_step(kind) {
        workflow.set_photo(slot, image()).await.unwrap();
    }
}

async fn confirm_step(workflow: &Workflow) -> Confirmation {
    fill_current(workflow).await;
    workflow.confirm().await.unwrap()
}

async fn through_pickup_rest(workflow: &Workflow) {
    fill_current(workflow).await;
    workflow.set_run_sheet("rs-001").await.unwrap();
    workflow.confirm().await.unwrap();
}

/// Walks check-in and pickup, leaving the cursor at departure.
async fn through_pickup(workflow: &Workflow) {
    confirm_step(workflow).await;
    through_pickup_rest(workflow).await;
}

#[tokio::test]
async fn test_normal_path_completes_with_success() {
    let h = harness();
    h.workflow.start(job(1)).await.unwrap();

    through_pickup(&h.workflow).await;
    confirm_step(&h.workflow).await; // departure
    let incident = confirm_step(&h.workflow).await;
    assert_eq!(incident.transition.step, StepKind::IncidentSelect);
    assert!(incident.transition.confirmed_at.is_none());
    assert!(incident.transition.activity.is_none());

    let session = h.workflow.snapshot().await;
    assert_eq!(session.step(), 4);
    assert_eq!(session.current_kind(), StepKind::Arrival);

    confirm_step(&h.workflow).await; // arrival
    let last = confirm_step(&h.workflow).await;

    let record = last.delivered().unwrap();
    assert_eq!(record.job_id, 1);
    assert_eq!(record.run_sheet, "RS-001");
    assert_eq!(record.status, DeliveryStatus::Success);
    assert_eq!(record.pickup_time, "2024-03-01 08:30");
    assert_eq!(record.delivery_time, "2024-03-01 08:30");
    assert_eq!(record.date, "2024-03-01");
    assert_eq!(record.incident_type, None);
    assert_eq!(record.incident_time, None);
    assert_eq!(record.incident_address, None);

    let completion = last.transition.completion.as_ref().unwrap();
    assert_eq!(completion.job.status, JobStatus::Delivered);

    assert_eq!(h.store.activities().len(), 5);
    assert_eq!(h.store.deliveries(), vec![record.clone()]);
    assert_eq!(h.workflow.history(), vec![record.clone()]);
    assert_eq!(h.workflow.snapshot().await, WorkflowSession::INITIAL);
}

#[tokio::test]
async fn test_delayed_path_completes_with_delay() {
    let h = harness();
    h.workflow.start(job(2)).await.unwrap();
    through_pickup(&h.workflow).await;
    confirm_step(&h.workflow).await; // departure

    h.workflow.set_delayed(true).await.unwrap();
    h.workflow.select_incident(IncidentType::Traffic).await.unwrap();
    h.workflow.confirm().await.unwrap();

    let session = h.workflow.snapshot().await;
    assert_eq!(session.step(), 4);
    assert_eq!(session.current_kind(), StepKind::IncidentPhotos);
    assert_eq!(session.max_step(), 6);

    h.location.set_address(Some("Km 112, Highway 1"));
    let incident = confirm_step(&h.workflow).await;
    let activity = incident.transition.activity.unwrap();
    assert_eq!(activity.step, StepKind::IncidentPhotos);
    assert_eq!(activity.incident_type.as_deref(), Some("traffic"));
    assert_eq!(activity.photos.len(), 4);

    h.location.set_address(Some("Chiang Mai Hub"));
    confirm_step(&h.workflow).await; // arrival
    let last = confirm_step(&h.workflow).await;

    let record = last.delivered().unwrap();
    assert_eq!(record.status, DeliveryStatus::Delay);
    assert_eq!(record.incident_type.as_deref(), Some("traffic"));
    assert_eq!(record.incident_time.as_deref(), Some("2024-03-01 08:30"));
    assert_eq!(record.incident_address.as_deref(), Some("Km 112, Highway 1"));
    assert_eq!(h.store.activities().len(), 6);
}

#[tokio::test]
async fn test_other_incident_uses_description() {
    let h = harness();
    h.workflow.start(job(3)).await.unwrap();
    through_pickup(&h.workflow).await;
    confirm_step(&h.workflow).await;

    h.workflow.set_delayed(true).await.unwrap();
    h.workflow.select_incident(IncidentType::Other).await.unwrap();
    h.workflow.describe_incident("  Road closed for parade ").await.unwrap();
    h.workflow.confirm().await.unwrap();
    confirm_step(&h.workflow).await;
    confirm_step(&h.workflow).await;
    let last = confirm_step(&h.workflow).await;

    assert_eq!(
        last.delivered().unwrap().incident_type.as_deref(),
        Some("Road closed for parade")
    );
}

#[tokio::test]
async fn test_pickup_with_missing_photo_does_not_advance() {
    let h = harness();
    h.workflow.start(job(4)).await.unwrap();
    confirm_step(&h.workflow).await;

    for slot in [PickupSlot::BeforeClose, PickupSlot::Seal, PickupSlot::ClosedWithSeal] {
        h.workflow.set_photo(PhotoSlot::Pickup(slot), image()).await.unwrap();
    }
    h.workflow.set_run_sheet("RS-001").await.unwrap();

    let before = h.workflow.snapshot().await;
    let err = h.workflow.confirm().await.unwrap_err();
    assert!(matches!(err, WorkflowError::StepNotReady { step: StepKind::Pickup, .. }));
    assert!(err.is_input_error());

    let after = h.workflow.snapshot().await;
    assert_eq!(after, before);
    assert_eq!(after.step(), 1);
    assert!(after.times().pickup.is_none());
    assert_eq!(h.store.activities().len(), 1);
}

#[tokio::test]
async fn test_pickup_requires_run_sheet() {
    let h = harness();
    h.workflow.start(job(5)).await.unwrap();
    confirm_step(&h.workflow).await;
    fill_current(&h.workflow).await;

    let err = h.workflow.confirm().await.unwrap_err();
    match err {
        WorkflowError::StepNotReady { step, reason } => {
            assert_eq!(step, StepKind::Pickup);
            assert!(reason.contains("run sheet"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_address_failure_still_advances_and_keeps_address() {
    let h = harness();
    h.workflow.start(job(6)).await.unwrap();
    confirm_step(&h.workflow).await;

    let session = h.workflow.snapshot().await;
    assert_eq!(session.current_address(), Some("12 Rama IV Rd, Bangkok"));
    let synced = session.location_synced_at();
    assert!(synced.is_some());

    h.location.set_address(None);
    fill_current(&h.workflow).await;
    h.workflow.set_run_sheet("RS-001").await.unwrap();
    let confirmation = h.workflow.confirm().await.unwrap();
    assert!(confirmation.is_saved());

    let session = h.workflow.snapshot().await;
    assert_eq!(session.step(), 2);
    assert!(session.times().pickup.is_some());
    assert_eq!(session.current_address(), Some("12 Rama IV Rd, Bangkok"));
    assert_eq!(session.location_synced_at(), synced);
}

#[tokio::test]
async fn test_each_confirmation_stamps_only_its_step() {
    let h = harness();
    h.workflow.start(job(7)).await.unwrap();

    confirm_step(&h.workflow).await;
    let times = h.workflow.snapshot().await.times().clone();
    assert_eq!(times.count(), 1);
    assert!(times.check_in.is_some());

    through_pickup_rest(&h.workflow).await;
    let times = h.workflow.snapshot().await.times().clone();
    assert_eq!(times.count(), 2);
    assert!(times.pickup.is_some());

    confirm_step(&h.workflow).await;
    assert_eq!(h.workflow.snapshot().await.times().count(), 3);

    // Incident selection records nothing.
    confirm_step(&h.workflow).await;
    let times = h.workflow.snapshot().await.times().clone();
    assert_eq!(times.count(), 3);
    assert!(times.incident.is_none());

    confirm_step(&h.workflow).await;
    let times = h.workflow.snapshot().await.times().clone();
    assert_eq!(times.count(), 4);
    assert!(times.arrival.is_some());
    assert!(times.delivery.is_none());
}

#[tokio::test]
async fn test_photo_slots_only_accept_current_step() {
    let h = harness();
    h.workflow.start(job(8)).await.unwrap();

    let err = h
        .workflow
        .set_photo(PhotoSlot::Pickup(PickupSlot::Seal), image())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::SlotNotActive {
            owner: StepKind::Pickup,
            current: StepKind::CheckIn,
            ..
        }
    ));

    h.workflow
        .set_photo(PhotoSlot::CheckIn(CheckInSlot::Driver), image())
        .await
        .unwrap();
    let cleared = h
        .workflow
        .clear_photo(PhotoSlot::CheckIn(CheckInSlot::Driver))
        .await
        .unwrap();
    assert_eq!(cleared, Some(image()));

    let err = h
        .workflow
        .set_photo(PhotoSlot::CheckIn(CheckInSlot::Vehicle), EncodedImage::new("image/jpeg", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_steps_without_photos_are_not_gated() {
    let h = harness();
    h.workflow.start(job(9)).await.unwrap();
    through_pickup(&h.workflow).await;

    // Departure owns no slots; the empty incident set does not block it.
    let confirmation = h.workflow.confirm().await.unwrap();
    assert_eq!(confirmation.transition.step, StepKind::Departure);
}

#[tokio::test]
async fn test_delay_flag_locked_outside_incident_step() {
    let h = harness();
    h.workflow.start(job(10)).await.unwrap();

    let err = h.workflow.set_delayed(true).await.unwrap_err();
    assert!(matches!(err, WorkflowError::DelayLocked { step: StepKind::CheckIn }));

    through_pickup(&h.workflow).await;
    confirm_step(&h.workflow).await;

    h.workflow.set_delayed(true).await.unwrap();
    h.workflow.set_delayed(false).await.unwrap();
    h.workflow.confirm().await.unwrap();

    let err = h.workflow.set_delayed(true).await.unwrap_err();
    assert!(matches!(err, WorkflowError::DelayLocked { step: StepKind::Arrival }));
    assert!(!h.workflow.snapshot().await.is_delayed());
}

#[tokio::test]
async fn test_delayed_without_incident_type_is_not_ready() {
    let h = harness();
    h.workflow.start(job(11)).await.unwrap();
    through_pickup(&h.workflow).await;
    confirm_step(&h.workflow).await;

    h.workflow.set_delayed(true).await.unwrap();
    let err = h.workflow.confirm().await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::StepNotReady {
            step: StepKind::IncidentSelect,
            ..
        }
    ));

    // Turning the gate off clears the selection.
    h.workflow.select_incident(IncidentType::Weather).await.unwrap();
    h.workflow.set_delayed(false).await.unwrap();
    assert_eq!(h.workflow.snapshot().await.incident().incident_type(), None);
}

#[tokio::test]
async fn test_run_sheet_fixed_after_pickup() {
    let h = harness();
    h.workflow.start(job(12)).await.unwrap();
    through_pickup(&h.workflow).await;

    let err = h.workflow.set_run_sheet("RS-999").await.unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidInput { .. }));
    assert_eq!(h.workflow.snapshot().await.run_sheet(), "RS-001");
}

#[tokio::test]
async fn test_scanned_run_sheet_is_normalised() {
    let h = harness();
    h.workflow.start(job(13)).await.unwrap();
    let value = h
        .workflow
        .scan_run_sheet("https://dispatch.example/rs?runsheet=rs-042")
        .await
        .unwrap();
    assert_eq!(value, "RS-042");
}

#[tokio::test]
async fn test_terminal_guard_leaves_session_untouched() {
    let mut session = WorkflowSession::start(job(14));
    session.step = 5;
    let before = session.clone();

    let err = session
        .confirm_and_advance(
            &FixedClock::utc(instant()),
            &NoLocation,
            &crate::config::WorkflowConfig::default(),
        )
        .await
        .unwrap_err();

    match err {
        WorkflowError::IncompleteRecord { job_id, missing } => {
            assert_eq!(job_id, 14);
            assert!(missing.contains("pickup timestamp"));
            assert!(missing.contains("run sheet"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(session, before);
}

#[tokio::test]
async fn test_confirm_without_session() {
    let h = harness();
    let err = h.workflow.confirm().await.unwrap_err();
    assert!(matches!(err, WorkflowError::NoActiveSession));
}

#[tokio::test]
async fn test_start_rules() {
    let h = harness();
    let mut delivered = job(15);
    delivered.status = JobStatus::Delivered;
    let err = h.workflow.start(delivered).await.unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidInput { .. }));

    h.workflow.start(job(16)).await.unwrap();
    let err = h.workflow.start(job(17)).await.unwrap_err();
    assert!(matches!(err, WorkflowError::SessionActive { job_id: 16 }));
}

#[tokio::test]
async fn test_cancel_resets_without_saving() {
    let h = harness();
    h.workflow.start(job(18)).await.unwrap();
    fill_current(&h.workflow).await;

    let cancelled = h.workflow.cancel().await.unwrap();
    assert_eq!(cancelled.id, 18);
    assert_eq!(h.workflow.snapshot().await, WorkflowSession::INITIAL);
    assert!(h.store.activities().is_empty());
    assert!(h.workflow.history().is_empty());
}

#[tokio::test]
async fn test_second_confirm_is_rejected_while_one_is_held() {
    let h = harness();
    h.workflow.start(job(19)).await.unwrap();
    fill_current(&h.workflow).await;

    let guard = h.workflow.session.lock().await;
    let err = h.workflow.confirm().await.unwrap_err();
    assert!(matches!(err, WorkflowError::SessionBusy));
    drop(guard);

    h.workflow.confirm().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_confirm_in_flight_blocks_other_mutations() {
    let h = harness_with(FakeLocation::hanging());
    h.workflow.start(job(20)).await.unwrap();
    fill_current(&h.workflow).await;

    let (first, second) = tokio::join!(h.workflow.confirm(), async {
        tokio::task::yield_now().await;
        (
            h.workflow.confirm().await.map(|_| ()),
            h.workflow
                .clear_photo(PhotoSlot::CheckIn(CheckInSlot::Driver))
                .await
                .map(|_| ()),
        )
    });

    let first = first.unwrap();
    assert_eq!(first.transition.step, StepKind::CheckIn);
    assert!(matches!(second.0, Err(WorkflowError::SessionBusy)));
    assert!(matches!(second.1, Err(WorkflowError::SessionBusy)));

    let session = h.workflow.snapshot().await;
    assert_eq!(session.step(), 1);
    assert_eq!(session.current_address(), None);
    assert_eq!(h.location.lookups(), 1);
}

#[tokio::test]
async fn test_failed_activity_save_is_queued_and_retried() {
    let h = harness();
    h.store.fail_activities(true);
    h.workflow.start(job(21)).await.unwrap();

    let confirmation = confirm_step(&h.workflow).await;
    assert!(!confirmation.is_saved());
    assert_eq!(confirmation.activity_id, None);
    assert!(matches!(
        confirmation.save_errors[0],
        WorkflowError::Persistence { .. }
    ));
    assert_eq!(h.workflow.snapshot().await.step(), 1);
    assert_eq!(h.workflow.pending_saves().len(), 1);

    let report = h.workflow.retry_pending().await;
    assert_eq!(report.saved, 0);
    assert_eq!(report.remaining(), 1);
    assert_eq!(h.workflow.pending_saves().len(), 1);

    h.store.fail_activities(false);
    let report = h.workflow.retry_pending().await;
    assert_eq!(report.saved, 1);
    assert_eq!(report.remaining(), 0);
    assert!(h.workflow.pending_saves().is_empty());
    assert_eq!(h.store.activities()[0].step, StepKind::CheckIn);
}

#[tokio::test]
async fn test_failed_delivery_save_keeps_record() {
    let h = harness();
    h.store.fail_deliveries(true);
    h.workflow.start(job(22)).await.unwrap();
    through_pickup(&h.workflow).await;
    for _ in 0..4 {
        confirm_step(&h.workflow).await;
    }

    assert!(!h.workflow.snapshot().await.is_active());
    assert_eq!(h.workflow.history().len(), 1);
    let pending = h.workflow.pending_saves();
    assert_eq!(pending.len(), 1);
    assert!(matches!(&pending[0], PendingSave::Delivery(record) if record.job_id == 22));
    assert!(h.store.deliveries().is_empty());

    h.store.fail_deliveries(false);
    assert_eq!(h.workflow.retry_pending().await.saved, 1);
    assert_eq!(h.store.deliveries().len(), 1);
}

#[tokio::test]
async fn test_history_is_newest_first() {
    let h = harness();
    for id in [30, 31] {
        h.workflow.start(job(id)).await.unwrap();
        through_pickup(&h.workflow).await;
        for _ in 0..4 {
            confirm_step(&h.workflow).await;
        }
    }
    let ids: Vec<u64> = h.workflow.history().iter().map(|r| r.job_id).collect();
    assert_eq!(ids, vec![31, 30]);
}

#[tokio::test]
async fn test_capture_photo_through_camera() {
    let store = MemoryStore::new();
    let camera = ScriptedCamera::new(
        vec![Some(blurry_frame()), Some(sharp_frame()), None],
        vec![BlurDecision::Retake],
    );
    let workflow = WorkflowBuilder::new(Arc::new(store))
        .with_clock(Arc::new(FixedClock::utc(instant())))
        .with_camera(Arc::new(camera.clone()))
        .build()
        .unwrap();
    workflow.start(job(40)).await.unwrap();

    let driver = PhotoSlot::CheckIn(CheckInSlot::Driver);
    assert!(workflow.capture_photo(driver).await.unwrap());
    let session = workflow.snapshot().await;
    assert_eq!(session.photos().get(driver), Some(&sharp_frame().image));

    let vehicle = PhotoSlot::CheckIn(CheckInSlot::Vehicle);
    assert!(!workflow.capture_photo(vehicle).await.unwrap());
    assert_eq!(workflow.snapshot().await.photos().get(vehicle), None);
    assert_eq!(camera.captures(), 3);

    let err = workflow
        .capture_photo(PhotoSlot::Pickup(PickupSlot::Seal))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::SlotNotActive { .. }));
}

#[tokio::test]
async fn test_capture_photo_without_camera() {
    let h = harness();
    h.workflow.start(job(41)).await.unwrap();
    let err = h
        .workflow
        .capture_photo(PhotoSlot::CheckIn(CheckInSlot::Driver))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Configuration { .. }));
}

#[test]
fn test_step_labels_follow_progress() {
    let mut session = WorkflowSession::start(job(50));
    assert_eq!(session.step_label(0).as_deref(), Some("Confirm check-in"));

    session.times.stamp(StepKind::CheckIn, FixedClock::utc(instant()).now());
    session.times.stamp(StepKind::Pickup, FixedClock::utc(instant()).now());
    session.run_sheet = "RS-001".to_string();
    session.step = 2;

    assert_eq!(session.step_label(0).as_deref(), Some("Checked in 2024-03-01 08:30"));
    assert_eq!(
        session.step_label(1).as_deref(),
        Some("Picked up 2024-03-01 08:30 · run sheet RS-001")
    );
    assert_eq!(session.step_label(2).as_deref(), Some("Confirm departure"));
    assert_eq!(session.step_label(6), None);

    let views = session.step_views();
    assert_eq!(views.len(), 6);
    assert_eq!(views[1].state, StepState::Done);
    assert_eq!(views[2].state, StepState::Current);
    assert_eq!(views[3].state, StepState::Upcoming);
    assert_eq!(views[4].icon, "map-pin");
}

#[test]
fn test_step_labels_remap_on_delayed_branch() {
    let now = FixedClock::utc(instant()).now();
    let mut session = WorkflowSession::start(job(53));
    session.incident.set_delayed(true);
    session.step = 4;

    assert_eq!(session.step_label(4).as_deref(), Some("Confirm incident photos"));
    assert_eq!(session.step_label(5).as_deref(), Some("Confirm arrival"));
    assert_eq!(session.step_label(6).as_deref(), Some("Confirm delivery"));

    session.times.stamp(StepKind::IncidentPhotos, now.clone());
    session.times.stamp(StepKind::Arrival, now);
    session.step = 6;

    assert_eq!(
        session.step_label(4).as_deref(),
        Some("Incident reported 2024-03-01 08:30")
    );
    assert_eq!(session.step_label(5).as_deref(), Some("Arrived 2024-03-01 08:30"));
    assert_eq!(session.step_label(6).as_deref(), Some("Confirm delivery"));
    assert_eq!(session.step_label(7), None);
}

#[test]
fn test_step_labels_on_normal_branch_after_arrival() {
    let mut session = WorkflowSession::start(job(54));
    session.times.stamp(StepKind::Arrival, FixedClock::utc(instant()).now());
    session.step = 5;

    assert_eq!(session.step_label(4).as_deref(), Some("Arrived 2024-03-01 08:30"));
    assert_eq!(session.step_label(5).as_deref(), Some("Confirm delivery"));
    assert_eq!(session.step_label(6), None);
}

#[test]
fn test_step_icons_are_branch_aware() {
    let mut session = WorkflowSession::start(job(51));
    assert_eq!(session.step_icon(4), Some("map-pin"));
    session.incident.set_delayed(true);
    assert_eq!(session.step_icon(4), Some("camera"));
    assert_eq!(session.step_icon(6), Some("check-circle"));
}

#[test]
fn test_reset_restores_initial_state() {
    let mut session = WorkflowSession::start(job(52));
    session.step = 3;
    session.run_sheet = "RS-9".to_string();
    session.incident.set_delayed(true);
    session.incident_address = Some("somewhere".to_string());
    session.reset();
    assert_eq!(session, WorkflowSession::INITIAL);
    assert_eq!(session, WorkflowSession::default());
}

#[derive(Debug, Clone)]
enum Op {
    FillPhotos,
    RunSheet,
    Delay(bool),
    Select(usize),
    Confirm,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::FillPhotos),
        Just(Op::RunSheet),
        any::<bool>().prop_map(Op::Delay),
        (0..IncidentType::ALL.len()).prop_map(Op::Select),
        Just(Op::Confirm),
        Just(Op::Confirm),
    ]
}

proptest! {
    #[test]
    fn prop_step_stays_in_bounds_and_branch_locks(ops in prop::collection::vec(op(), 0..80)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let clock = FixedClock::utc(instant());
        let config = crate::config::WorkflowConfig::default();
        let mut session = WorkflowSession::start(job(60));
        let mut locked: Option<bool> = None;
        let mut completions = 0;

        for op in ops {
            match op {
                Op::FillPhotos => {
                    for slot in PhotoSlot::for_step(session.current_kind()) {
                        session.set_photo(slot, image()).unwrap();
                    }
                }
                Op::RunSheet => {
                    let _ = session.set_run_sheet("rs-1");
                }
                Op::Delay(delayed) => {
                    let result = session.set_delayed(delayed);
                    prop_assert_eq!(result.is_ok(), session.step() == INCIDENT_SELECT_INDEX);
                }
                Op::Select(index) => {
                    let _ = session.select_incident(IncidentType::ALL[index]);
                }
                Op::Confirm => {
                    if session.check_ready().is_ok() {
                        let transition = runtime
                            .block_on(session.confirm_and_advance(&clock, &NoLocation, &config))
                            .unwrap();
                        if let Some(completion) = transition.completion {
                            let expected = if locked == Some(true) {
                                DeliveryStatus::Delay
                            } else {
                                DeliveryStatus::Success
                            };
                            prop_assert_eq!(completion.record.status, expected);
                            prop_assert_eq!(&session, &WorkflowSession::INITIAL);
                            completions += 1;
                            session = WorkflowSession::start(job(60 + completions));
                            locked = None;
                        }
                    }
                }
            }

            prop_assert!(session.step() <= session.max_step());
            if session.is_delay_locked() {
                let delayed = session.is_delayed();
                prop_assert_eq!(*locked.get_or_insert(delayed), delayed);
            }
        }
    }
}
