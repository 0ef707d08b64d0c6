use super::*;

#[derive(Default)]
struct Recorder {
    reports: Vec<(u32, u32)>,
    tasks: Vec<String>,
    stop_at: Option<u32>,
}

impl ProgressCallback for Recorder {
    fn task(&mut self, description: &str) {
        self.tasks.push(description.to_owned());
    }

    fn amount_complete(&mut self, current: u32, total: u32) -> bool {
        self.reports.push((current, total));
        self.stop_at.is_none_or(|s| current < s)
    }
}

#[test]
fn sub_progress_maps_onto_parent_range() {
    let mut rec = Recorder::default();
    {
        let mut sub = SubProgress::new(&mut rec, 4500, 9000, 10000);
        assert!(sub.amount_complete(0, 10));
        assert!(sub.amount_complete(5, 10));
        assert!(sub.amount_complete(10, 10));
        assert!(sub.amount_complete(20, 10));
        sub.task("inner");
    }
    assert_eq!(
        rec.reports,
        vec![(4500, 10000), (6750, 10000), (9000, 10000), (9000, 10000)]
    );
    assert_eq!(rec.tasks, vec!["inner".to_owned()]);
}

#[test]
fn nested_sub_progress_composes() {
    let mut rec = Recorder::default();
    {
        let mut outer = SubProgress::new(&mut rec, 0, 5000, 10000);
        let mut inner = SubProgress::new(&mut outer, 5000, 10000, 10000);
        inner.amount_complete(10000, 10000);
    }
    assert_eq!(rec.reports, vec![(5000, 10000)]);
}

#[test]
fn cancellation_propagates_through_sub_progress() {
    let mut rec = Recorder {
        stop_at: Some(5000),
        ..Recorder::default()
    };
    let mut sub = SubProgress::new(&mut rec, 0, 10000, 10000);
    assert!(sub.amount_complete(1, 4));
    assert!(!sub.amount_complete(3, 4));
}

#[test]
fn sub_progress_clamps_bad_ranges() {
    let mut rec = Recorder::default();
    {
        let mut sub = SubProgress::new(&mut rec, 9000, 20000, 10000);
        sub.amount_complete(1, 0);
        sub.amount_complete(1, 1);
    }
    assert_eq!(rec.reports, vec![(9000, 10000), (10000, 10000)]);
}

#[test]
fn builtin_callbacks_never_cancel() {
    assert!(NoProgress.amount_complete(3, 4));
    let mut t = TracingProgress::default();
    assert!(t.amount_complete(3, 4));
    assert!(t.amount_complete(5, 0));
}
