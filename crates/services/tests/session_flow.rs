use std::collections::HashSet;
use std::sync::Arc;

use quiz_core::filter::Selection;
use quiz_core::model::{QuestionDraft, QuestionStatus};
use quiz_core::time::fixed_clock;
use services::{QuizConfig, QuizRunner, SessionPhase, SkipOutcome, SourceLocation};
use storage::{InMemorySource, QuestionSource, QuestionStore};

fn bank(set: &str, count: usize) -> String {
    let records: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"questionSet":"{set}","module":"Module {m}","chapter":"Chapter {i}","question":"{set} #{i}","options":["A","B","C","D"],"answerIndex":{a},"explanation":"Because."}}"#,
                m = i % 2,
                a = i % 4
            )
        })
        .collect();
    format!("[{}]", records.join(","))
}

async fn load(sources: Vec<InMemorySource>) -> QuestionStore {
    let sources: Vec<Arc<dyn QuestionSource>> = sources
        .into_iter()
        .map(|s| Arc::new(s) as Arc<dyn QuestionSource>)
        .collect();
    QuestionStore::load(&sources).await
}

#[tokio::test]
async fn three_question_run_scores_one_of_three() {
    let store = load(vec![InMemorySource::new("Questions-Set-1.json", bank("Questions-Set-1", 3))]).await;
    let mut runner = QuizRunner::with_store(QuizConfig::default(), store).with_clock(fixed_clock());

    runner.start(&Selection::all()).unwrap();
    assert_eq!(runner.session().total(), 3);

    let correct = runner.session().current_question().unwrap().answer_index();
    runner.select_answer(correct).unwrap();
    runner.next().unwrap();

    let outcome = runner.skip().unwrap();
    assert_eq!(outcome, SkipOutcome::Moved { to: 2 });
    assert_eq!(runner.session().statuses()[1], QuestionStatus::Skipped);

    let wrong = (runner.session().current_question().unwrap().answer_index() + 1) % 4;
    runner.select_answer(wrong).unwrap();

    let summary = runner.finish().unwrap();
    assert_eq!(summary.score(), 1);
    assert_eq!(summary.total(), 3);
    assert_eq!(summary.attempted(), 2);
    assert_eq!(summary.percentage_label(), "33.33");
    assert_eq!(runner.view().phase, SessionPhase::Finished);
}

#[tokio::test]
async fn large_pool_is_capped_at_fifty_distinct_questions() {
    let store = load(vec![
        InMemorySource::new("Questions-Set-1.json", bank("Questions-Set-1", 120)),
        InMemorySource::new("Questions-Set-2.json", bank("Questions-Set-2", 80)),
    ])
    .await;
    assert_eq!(store.len(), 200);

    let mut runner = QuizRunner::with_store(QuizConfig::default(), store).with_clock(fixed_clock());
    runner.start(&Selection::all()).unwrap();

    let ids: HashSet<_> = runner.session().questions().iter().map(|q| q.id()).collect();
    assert_eq!(runner.session().total(), 50);
    assert_eq!(ids.len(), 50);
    assert!(ids.iter().all(|id| runner.store().get(*id).is_some()));
}

#[tokio::test]
async fn filtered_subset_keeps_only_matching_questions() {
    let store = load(vec![
        InMemorySource::new("Questions-Set-1.json", bank("Questions-Set-1", 6)),
        InMemorySource::unavailable("Questions-Set-2.json"),
        InMemorySource::new("Questions-Set-3.json", bank("Questions-Set-3", 4)),
    ])
    .await;
    let mut runner = QuizRunner::with_store(QuizConfig::default(), store).with_clock(fixed_clock());

    assert_eq!(
        runner.menus().question_sets,
        vec!["Questions-Set-1", "Questions-Set-3"]
    );

    runner.start(&Selection::by_set("Questions-Set-3")).unwrap();
    assert_eq!(runner.session().total(), 4);
    assert!(
        runner
            .session()
            .questions()
            .iter()
            .all(|q| q.question_set() == "Questions-Set-3")
    );
}

#[tokio::test]
async fn runner_loads_configured_directory() {
    let dir = std::env::temp_dir().join(format!("quiz-runner-{}", std::process::id()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    tokio::fs::write(dir.join("bank-a.json"), bank("Questions-Set-1", 5))
        .await
        .unwrap();
    tokio::fs::write(dir.join("bank-b.json"), "{\"oops\":true}")
        .await
        .unwrap();

    let config = QuizConfig {
        sources: vec!["bank-a.json".into(), "bank-b.json".into()],
        location: SourceLocation::Directory(dir.clone()),
        questions_per_test: 3,
    };
    let mut runner = QuizRunner::load(config).await.with_clock(fixed_clock());

    assert_eq!(runner.store().len(), 5);
    assert_eq!(runner.store().warnings().len(), 1);

    runner.start(&Selection::by_module("Module 0")).unwrap();
    assert_eq!(runner.session().total(), 3);

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}

#[test]
fn empty_pool_degrades_every_selection() {
    let store = QuestionStore::from_drafts("none", Vec::<QuestionDraft>::new());
    let mut runner = QuizRunner::with_store(QuizConfig::default(), store);

    let err = runner.start(&Selection::all()).unwrap_err();
    assert_eq!(err.to_string(), "empty result");
    let err = runner.start(&Selection::by_chapter("")).unwrap_err();
    assert_eq!(err.to_string(), "missing selection");
    assert_eq!(runner.session().phase(), SessionPhase::Idle);
}
