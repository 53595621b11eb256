use scenariogen_engine::{Engine, EngineConfig, RunRequest};
use scenariogen_error::{ErrorCategory, PipelineError};
use scenariogen_llm::{FailingGenerator, MockGenerator, ScriptedGenerator};
use scenariogen_ports::Publisher;
use scenariogen_schema::{ArtifactKind, PublishOutcome, PublishRecord};
use scenariogen_testkit::{
    CLEAN_SCENARIOS, CLEAN_TEST_CODE, FENCED_SCENARIOS, FENCED_TEST_CODE,
};
use std::cell::RefCell;
use std::path::Path;
use tempfile::TempDir;

#[derive(Default)]
struct RecordingPublisher {
    records: RefCell<Vec<PublishRecord>>,
}

impl Publisher for RecordingPublisher {
    fn branch(&self) -> &str {
        "main"
    }

    fn preview_url(&self, remote_path: &str) -> String {
        format!("https://github.com/acme/qa-cases/blob/main/{remote_path}")
    }

    fn publish(&self, record: &PublishRecord) -> Result<String, PipelineError> {
        self.records.borrow_mut().push(record.clone());
        Ok(self.preview_url(&record.remote_path))
    }
}

struct RejectingPublisher;

impl Publisher for RejectingPublisher {
    fn branch(&self) -> &str {
        "main"
    }

    fn preview_url(&self, remote_path: &str) -> String {
        format!("https://github.com/acme/qa-cases/blob/main/{remote_path}")
    }

    fn publish(&self, _record: &PublishRecord) -> Result<String, PipelineError> {
        Err(PipelineError::publish_status(422, r#"{"message":"sha wasn't supplied"}"#))
    }
}

fn config(root: &Path, publish: bool) -> EngineConfig {
    EngineConfig {
        output_root: root.to_path_buf(),
        publish,
    }
}

fn cart_request() -> RunRequest {
    let mut req = RunRequest::new(
        ArtifactKind::ScenarioSet,
        "user can add item to cart",
        "Checkout Squad",
    );
    req.tag = Some("P1".into());
    req
}

fn files_under(dir: &Path) -> usize {
    if !dir.exists() {
        return 0;
    }
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| {
            let e = e.unwrap();
            if e.file_type().unwrap().is_dir() {
                files_under(&e.path())
            } else {
                1
            }
        })
        .sum()
}

#[test]
fn add_to_cart_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let generator = MockGenerator {
        response: FENCED_SCENARIOS.to_string(),
    };
    let publisher = RecordingPublisher::default();
    let engine = Engine::new(&generator, &publisher, config(tmp.path(), true));

    let report = engine.run(&cart_request()).unwrap();

    let expected = tmp
        .path()
        .join("test-cases/checkout_squad/user_can_add_item_to_cart.txt");
    assert_eq!(report.local_path, expected);

    let on_disk = std::fs::read_to_string(&expected).unwrap();
    assert_eq!(on_disk, report.content);
    assert!(on_disk.starts_with("@P1\n\n"));
    assert!(!on_disk.contains("```"));
    assert!(!on_disk.contains("**Scenario"));
    assert_eq!(on_disk, format!("@P1\n\n{CLEAN_SCENARIOS}"));

    assert_eq!(
        report.publish,
        PublishOutcome::Published {
            preview_url: "https://github.com/acme/qa-cases/blob/main/test-cases/checkout_squad/user_can_add_item_to_cart.txt".into()
        }
    );
    assert!(report.derived.is_none());

    let records = publisher.records.borrow();
    assert_eq!(records.len(), 1);
    let rec = &records[0];
    assert_eq!(rec.remote_path, "test-cases/checkout_squad/user_can_add_item_to_cart.txt");
    assert_eq!(rec.branch, "main");
    assert_eq!(rec.content, on_disk.as_bytes());
    assert!(rec.commit_message.starts_with(
        "Add test cases for `user_can_add_item_to_cart.txt` in `test-cases/checkout_squad` folder."
    ));
    assert!(rec.commit_message.contains("**Tags**: `@P1`"));
}

#[test]
fn second_run_gets_numbered_file() {
    let tmp = TempDir::new().unwrap();
    let generator = MockGenerator {
        response: CLEAN_SCENARIOS.to_string(),
    };
    let publisher = RecordingPublisher::default();
    let engine = Engine::new(&generator, &publisher, config(tmp.path(), false));

    let first = engine.run(&cart_request()).unwrap();
    let second = engine.run(&cart_request()).unwrap();
    let third = engine.run(&cart_request()).unwrap();

    assert!(first.local_path.ends_with("user_can_add_item_to_cart.txt"));
    assert!(second.local_path.ends_with("user_can_add_item_to_cart_1.txt"));
    assert!(third.local_path.ends_with("user_can_add_item_to_cart_2.txt"));
}

#[test]
fn no_tags_means_no_leading_blank_line() {
    let tmp = TempDir::new().unwrap();
    let generator = MockGenerator {
        response: FENCED_SCENARIOS.to_string(),
    };
    let publisher = RecordingPublisher::default();
    let engine = Engine::new(&generator, &publisher, config(tmp.path(), true));

    let mut req = cart_request();
    req.tag = None;
    let report = engine.run(&req).unwrap();

    assert_eq!(report.content, CLEAN_SCENARIOS);
    let records = publisher.records.borrow();
    assert!(!records[0].commit_message.contains("**Tags**"));
}

#[test]
fn tags_are_composed_in_order() {
    let tmp = TempDir::new().unwrap();
    let generator = MockGenerator {
        response: CLEAN_SCENARIOS.to_string(),
    };
    let publisher = RecordingPublisher::default();
    let engine = Engine::new(&generator, &publisher, config(tmp.path(), false));

    let mut req = cart_request();
    req.tag = Some("P0".into());
    req.other_tags = Some("smoke, @login".into());
    let report = engine.run(&req).unwrap();

    assert!(report.content.starts_with("@P0 @smoke @login\n\n"));
}

#[test]
fn publishing_disabled_skips_publisher() {
    let tmp = TempDir::new().unwrap();
    let generator = MockGenerator {
        response: CLEAN_SCENARIOS.to_string(),
    };
    let publisher = RecordingPublisher::default();
    let engine = Engine::new(&generator, &publisher, config(tmp.path(), false));

    let report = engine.run(&cart_request()).unwrap();

    assert_eq!(report.publish, PublishOutcome::Skipped);
    assert!(publisher.records.borrow().is_empty());
    assert!(report.local_path.exists());
}

#[test]
fn generation_failure_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let publisher = RecordingPublisher::default();
    let engine = Engine::new(&FailingGenerator, &publisher, config(tmp.path(), true));

    let err = engine.run(&cart_request()).unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Generation);
    assert_eq!(err.exit_code(), 3);
    assert_eq!(files_under(tmp.path()), 0);
    assert!(publisher.records.borrow().is_empty());
}

#[test]
fn blank_response_is_a_generation_error() {
    let tmp = TempDir::new().unwrap();
    let generator = MockGenerator {
        response: "  \n\t ".to_string(),
    };
    let publisher = RecordingPublisher::default();
    let engine = Engine::new(&generator, &publisher, config(tmp.path(), true));

    let err = engine.run(&cart_request()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Generation);
    assert_eq!(files_under(tmp.path()), 0);
}

#[test]
fn fences_only_response_is_a_generation_error() {
    let tmp = TempDir::new().unwrap();
    let generator = MockGenerator {
        response: "```gherkin\n```".to_string(),
    };
    let publisher = RecordingPublisher::default();
    let engine = Engine::new(&generator, &publisher, config(tmp.path(), false));

    let err = engine.run(&cart_request()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Generation);
    assert_eq!(files_under(tmp.path()), 0);
}

#[test]
fn publish_failure_keeps_local_file() {
    let tmp = TempDir::new().unwrap();
    let generator = MockGenerator {
        response: FENCED_SCENARIOS.to_string(),
    };
    let engine = Engine::new(&generator, &RejectingPublisher, config(tmp.path(), true));

    let report = engine.run(&cart_request()).unwrap();

    match &report.publish {
        PublishOutcome::Failed { status, message } => {
            assert_eq!(*status, Some(422));
            assert!(message.contains("sha wasn't supplied"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    let on_disk = std::fs::read_to_string(&report.local_path).unwrap();
    assert_eq!(on_disk, report.content);
}

#[test]
fn empty_squad_fails_before_generation() {
    let tmp = TempDir::new().unwrap();
    let generator = ScriptedGenerator::new(Vec::<String>::new());
    let publisher = RecordingPublisher::default();
    let engine = Engine::new(&generator, &publisher, config(tmp.path(), true));

    let mut req = cart_request();
    req.squad = "   ".into();
    let err = engine.run(&req).unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert!(generator.prompts().is_empty());
    assert_eq!(files_under(tmp.path()), 0);
}

#[test]
fn headless_run_writes_plain_code() {
    let tmp = TempDir::new().unwrap();
    let generator = MockGenerator {
        response: FENCED_TEST_CODE.to_string(),
    };
    let publisher = RecordingPublisher::default();
    let engine = Engine::new(&generator, &publisher, config(tmp.path(), true));

    let mut req = cart_request();
    req.kind = ArtifactKind::TestCode;
    req.other_tags = Some("smoke".into());
    let report = engine.run(&req).unwrap();

    assert_eq!(
        report.local_path,
        tmp.path().join("headless-test/checkout_squad/user_can_add_item_to_cart.txt")
    );
    assert_eq!(report.content, CLEAN_TEST_CODE);

    let records = publisher.records.borrow();
    assert!(records[0].commit_message.starts_with("Add headless test for"));
    assert!(records[0].commit_message.contains("`@P1`, `@smoke`"));
}

#[test]
fn derived_pass_writes_test_code_from_scenarios() {
    let tmp = TempDir::new().unwrap();
    let generator = ScriptedGenerator::new([FENCED_SCENARIOS, FENCED_TEST_CODE]);
    let publisher = RecordingPublisher::default();
    let engine = Engine::new(&generator, &publisher, config(tmp.path(), true));

    let mut req = cart_request();
    req.with_test_code = true;
    let report = engine.run(&req).unwrap();

    let derived = report.derived.as_deref().unwrap();
    assert_eq!(derived.kind, ArtifactKind::TestCode);
    assert_eq!(
        derived.local_path,
        tmp.path().join("headless-test/checkout_squad/user_can_add_item_to_cart.txt")
    );
    assert_eq!(derived.content, CLEAN_TEST_CODE);

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].contains(CLEAN_SCENARIOS));
    assert!(!prompts[1].contains("@P1"));

    let records = publisher.records.borrow();
    assert_eq!(records.len(), 2);
    assert!(records[1].remote_path.starts_with("headless-test/"));
}

#[test]
fn derived_failure_names_saved_scenarios() {
    let tmp = TempDir::new().unwrap();
    let generator = ScriptedGenerator::new([FENCED_SCENARIOS]);
    let publisher = RecordingPublisher::default();
    let engine = Engine::new(&generator, &publisher, config(tmp.path(), false));

    let mut req = cart_request();
    req.with_test_code = true;
    let err = engine.run(&req).unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Generation);
    assert!(err.to_string().contains("user_can_add_item_to_cart.txt"));
    assert_eq!(files_under(&tmp.path().join("test-cases")), 1);
    assert_eq!(files_under(&tmp.path().join("headless-test")), 0);
}

#[test]
fn with_test_code_is_ignored_for_headless_runs() {
    let tmp = TempDir::new().unwrap();
    let generator = ScriptedGenerator::new([FENCED_TEST_CODE]);
    let publisher = RecordingPublisher::default();
    let engine = Engine::new(&generator, &publisher, config(tmp.path(), false));

    let mut req = cart_request();
    req.kind = ArtifactKind::TestCode;
    req.with_test_code = true;
    let report = engine.run(&req).unwrap();

    assert!(report.derived.is_none());
    assert_eq!(generator.prompts().len(), 1);
}

#[test]
fn background_reaches_the_prompt() {
    let tmp = TempDir::new().unwrap();
    let generator = ScriptedGenerator::new([CLEAN_SCENARIOS]);
    let publisher = RecordingPublisher::default();
    let engine = Engine::new(&generator, &publisher, config(tmp.path(), false));

    let mut req = cart_request();
    req.background = Some("FoodNow".into());
    req.additional_background = Some("Guests cannot check out".into());
    engine.run(&req).unwrap();

    let prompt = &generator.prompts()[0];
    assert!(prompt.contains("Requirement: user can add item to cart"));
    assert!(prompt.contains("FoodNow"));
    assert!(prompt.contains("Additional context: Guests cannot check out"));
}

#[test]
fn derived_pass_keeps_background_and_additional_context() {
    let tmp = TempDir::new().unwrap();
    let generator = ScriptedGenerator::new([FENCED_SCENARIOS, FENCED_TEST_CODE]);
    let publisher = RecordingPublisher::default();
    let engine = Engine::new(&generator, &publisher, config(tmp.path(), false));

    let mut req = cart_request();
    req.with_test_code = true;
    req.background = Some("FoodNow".into());
    req.additional_background = Some("Guests cannot check out".into());
    engine.run(&req).unwrap();

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].contains("Background: FoodNow\n"));
    assert!(prompts[1].contains("Additional context: Guests cannot check out\n"));
}

#[test]
fn write_failure_aborts_before_publish() {
    let tmp = TempDir::new().unwrap();
    let not_a_dir = tmp.path().join("not-a-dir");
    std::fs::write(&not_a_dir, "plain file").unwrap();

    let generator = MockGenerator {
        response: FENCED_SCENARIOS.to_string(),
    };
    let publisher = RecordingPublisher::default();
    let engine = Engine::new(&generator, &publisher, config(&not_a_dir, true));

    let err = engine.run(&cart_request()).unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Filesystem);
    assert_eq!(err.exit_code(), 4);
    assert!(publisher.records.borrow().is_empty());
    assert_eq!(std::fs::read_to_string(&not_a_dir).unwrap(), "plain file");
}
