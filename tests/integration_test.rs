use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::BoxFuture;
use score_matrix::error::AppResult;
use score_matrix::models::Diagnosis;
use score_matrix::orchestrator::build_class_summary;
use score_matrix::scoring::CompositeScorer;
use score_matrix::services::ReportWriter;
use score_matrix::{
    App, CompletionService, Config, Question, QuestionDispatcher, QuestionType, ScoreSource,
    ScoringRequest, WeakTopicDiagnoser,
};

/// 按提示词内容回答的离线补全服务
struct OfflineJudge {
    calls: AtomicUsize,
    score: &'static str,
    diagnosis: &'static str,
}

impl OfflineJudge {
    fn new(score: &'static str, diagnosis: &'static str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            score,
            diagnosis,
        }
    }

    fn reply(&self, prompt: &str) -> String {
        if prompt.starts_with("Classify") {
            if prompt.contains("capital") { "MCQ" } else { "Descriptive" }.to_string()
        } else if prompt.contains("Provide a score between") {
            self.score.to_string()
        } else if prompt.contains("Analyze the student's mistakes") {
            self.diagnosis.to_string()
        } else if prompt.contains("capital") {
            "Paris".to_string()
        } else {
            "Photosynthesis converts light to energy.".to_string()
        }
    }
}

impl CompletionService for OfflineJudge {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        _system: Option<&'a str>,
    ) -> BoxFuture<'a, AppResult<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.reply(prompt);
        Box::pin(async move { Ok(reply) })
    }

    fn model_name(&self) -> &str {
        "offline"
    }
}

#[tokio::test]
async fn test_objective_case_insensitive_full_marks() {
    let judge = Arc::new(OfflineJudge::new("0", "{}"));
    let dispatcher = QuestionDispatcher::new(CompositeScorer::default(), Some(judge.clone()));
    let question = Question::new(1, "What is the capital of France?", QuestionType::Objective, 1.0);

    let result = dispatcher
        .score(ScoringRequest::new(&question, "Paris", "paris"))
        .await;

    assert_eq!(result.awarded, 1.0);
    assert_eq!(result.source, ScoreSource::Exact);
    assert_eq!(judge.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_descriptive_answer_is_floored_and_diagnosed() {
    let judge = Arc::new(OfflineJudge::new("5", "not json at all"));
    let dispatcher = QuestionDispatcher::new(CompositeScorer::default(), Some(judge.clone()));
    let diagnoser = WeakTopicDiagnoser::new(Some(judge.clone()), 0.8);
    let question = Question::new(2, "Explain photosynthesis.", QuestionType::Descriptive, 5.0);
    let reference = "Photosynthesis converts light to energy.";

    let result = dispatcher
        .score(ScoringRequest::new(&question, reference, ""))
        .await;

    assert_eq!(result.source, ScoreSource::LocalEnsemble);
    assert!(result.awarded >= 0.0 && result.awarded < 4.0);
    assert_eq!(judge.calls.load(Ordering::SeqCst), 0);
    assert!(diagnoser.should_diagnose(result.awarded, result.max_marks));

    let diagnosis = diagnoser.diagnose(&question, reference, "").await;
    assert_eq!(diagnosis, Diagnosis::unknown());
}

fn config_in(dir: &Path) -> Config {
    let path = |name: &str| dir.join(name).display().to_string();
    Config {
        question_paper_path: path("uploads/question-paper.txt"),
        answer_key_path: path("outputs/answer_key.toml"),
        sheets_folder: path("uploads"),
        results_folder: path("data"),
        students_store_path: path("data/students.json"),
        failure_log_file: path("failures.txt"),
        output_log_file: path("output.txt"),
        max_concurrent_sheets: 2,
        ..Config::default()
    }
}

fn write(path: impl AsRef<Path>, content: &str) {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

#[tokio::test]
async fn test_batch_run_then_summary_with_missing_result_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let uploads = dir.path().join("uploads");

    write(
        &config.question_paper_path,
        "Midterm\nQuestion 1 What is the capital of France? [1 marks]\n\
         Question 2 Explain photosynthesis. [5 marks]\n",
    );
    write(
        uploads.join("s1.txt"),
        "Roll Number: 101\nAns 1: paris\nAns 2: Plants use light to make energy.",
    );
    write(uploads.join("s2.txt"), "Roll Number: 102\nAns 1: London\nAns 2:");
    write(
        uploads.join("s3.txt"),
        "Roll Number: 103\nAns 1: Paris\u{c}Ans 2: Light becomes chemical energy.",
    );
    write(
        &config.students_store_path,
        r#"[{"rollNumber": "101", "weakTopics": "-"}, {"rollNumber": "102", "name": "Ravi", "weakTopics": "-"}]"#,
    );

    let judge = Arc::new(OfflineJudge::new(
        "4.5",
        r#"{"weak_topic": "Photosynthesis", "tips": ["Revise the light reactions"]}"#,
    ));
    let app = App::with_service(config.clone(), Some(judge)).unwrap();
    let report = app.run().await.unwrap();

    assert_eq!(report.graded, 3);
    assert_eq!(report.failed, 0);
    assert!(Path::new(&config.answer_key_path).exists());

    let summary = &report.summary;
    assert_eq!(summary.student_summaries.len(), 3);
    let first = &summary.student_summaries[0];
    assert_eq!(first.roll_number, "101");
    assert_eq!(first.total_marks, 6.0);
    assert_eq!(first.marks_awarded, 5.5);
    assert_eq!(first.percentage, 91.67);

    let second: Vec<_> = summary
        .individual_results
        .iter()
        .filter(|r| r.roll_number == "102")
        .collect();
    assert_eq!(second.len(), 2);
    assert_eq!(second[0].marks_awarded, 0.0);
    assert_eq!(second[1].source, ScoreSource::LocalEnsemble);
    assert_eq!(second[1].weak_topics.as_deref(), Some("Photosynthesis"));

    let students: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config.students_store_path).unwrap())
            .unwrap();
    assert_eq!(students[0]["weakTopics"], "-");
    assert_eq!(students[1]["weakTopics"], "Photosynthesis, Photosynthesis");
    assert_eq!(students[1]["name"], "Ravi");

    let writer = ReportWriter::new(&config.results_folder);
    assert!(writer.class_summary_path().exists());

    // 删除一个学生的结果文件后重新汇总
    std::fs::remove_file(writer.results_path("s2")).unwrap();
    let stems = vec!["s1".to_string(), "s2".to_string(), "s3".to_string()];
    let partial = build_class_summary(&writer, &stems).await;

    assert_eq!(partial.student_summaries.len(), 2);
    assert_eq!(partial.skipped, vec!["s2".to_string()]);
    assert_eq!(partial.class_average, 91.67);
    assert!(partial
        .individual_results
        .iter()
        .all(|r| r.roll_number != "102"));
}
