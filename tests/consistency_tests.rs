mod common;

use assessor::{
    assess::{
        Adjudication, EvaluatedAnswer, GradedAssessment,
        consistency::analyze,
        score::{SummaryHeader, aggregate},
    },
    oracle::Verdict,
};
use common::verdict;

fn header() -> SummaryHeader {
    SummaryHeader {
        student_name:    "Ada Lovelace".to_string(),
        date:            None,
        assessment_name: Some("Quiz 1".to_string()),
        subject:         None,
        section:         None,
    }
}

fn judged(number: u32, value: u32, v: Verdict) -> EvaluatedAnswer {
    EvaluatedAnswer {
        number,
        value,
        answer_match: false,
        adjudication: Adjudication::Judged(v),
    }
}

fn run(answers: Vec<EvaluatedAnswer>) -> GradedAssessment {
    let summary = aggregate(header(), &answers).expect("aggregate");
    GradedAssessment { answers, summary }
}

#[test]
fn identical_runs_are_consistent() {
    let make = || {
        run(vec![
            EvaluatedAnswer {
                number:       1,
                value:        10,
                answer_match: true,
                adjudication: Adjudication::ExactMatch,
            },
            judged(2, 5, verdict(false, false, "wrong")),
        ])
    };
    let runs = [make(), make(), make()];

    let analysis = analyze(&runs).expect("analyze");

    assert!(analysis.is_consistent);
    assert_eq!(analysis.total_runs, 3);
    assert_eq!(analysis.unique_final_grades, 1);
    assert_eq!(analysis.grade_range, 0.0);
    assert_eq!(analysis.grade_statistics.std_dev, 0.0);
    assert!(analysis.inconsistent_questions.is_empty());
}

#[test]
fn varying_verdicts_surface_per_question_distributions() {
    let runs = [
        run(vec![judged(1, 10, verdict(true, false, "right"))]),
        run(vec![judged(1, 10, verdict(false, true, "close"))]),
        run(vec![judged(1, 10, verdict(false, false, "wrong"))]),
    ];

    let analysis = analyze(&runs).expect("analyze");

    assert!(!analysis.is_consistent);
    assert_eq!(analysis.unique_final_grades, 3);
    assert_eq!(analysis.grade_statistics.mean, 50.0);
    assert_eq!(analysis.grade_statistics.median, 50.0);
    assert_eq!(analysis.grade_statistics.min, 0.0);
    assert_eq!(analysis.grade_statistics.max, 100.0);
    assert_eq!(analysis.grade_range, 100.0);
    assert_eq!(analysis.grade_statistics.std_dev, 50.0);

    let question = analysis
        .inconsistent_questions
        .get(&1)
        .expect("question 1 varied");
    assert_eq!(question.max_points, 10);
    let scores: Vec<u32> = question.score_distribution.keys().copied().collect();
    assert_eq!(scores, vec![0, 5, 10]);
    for share in question.score_distribution.values() {
        assert_eq!(share.count, 1);
        assert!((share.percentage - 100.0 / 3.0).abs() < 1e-9);
    }
}

#[test]
fn stable_questions_are_left_out_of_the_breakdown() {
    let runs = [
        run(vec![
            judged(1, 10, verdict(true, false, "right")),
            judged(2, 4, verdict(false, false, "wrong")),
        ]),
        run(vec![
            judged(1, 10, verdict(false, true, "close")),
            judged(2, 4, verdict(false, false, "wrong")),
        ]),
    ];

    let analysis = analyze(&runs).expect("analyze");

    assert!(analysis.inconsistent_questions.contains_key(&1));
    assert!(!analysis.inconsistent_questions.contains_key(&2));
}

#[test]
fn median_of_an_even_run_count_averages_the_middle_pair() {
    let runs = [
        run(vec![judged(1, 10, verdict(true, false, "right"))]),
        run(vec![judged(1, 10, verdict(false, false, "wrong"))]),
    ];

    let analysis = analyze(&runs).expect("analyze");
    assert_eq!(analysis.grade_statistics.median, 50.0);
    assert_eq!(analysis.grade_statistics.all_grades, vec![100.0, 0.0]);
}

#[test]
fn a_single_run_has_zero_spread() {
    let runs = [run(vec![judged(1, 10, verdict(false, true, "close"))])];

    let analysis = analyze(&runs).expect("analyze");
    assert!(analysis.is_consistent);
    assert_eq!(analysis.grade_statistics.std_dev, 0.0);
    assert_eq!(analysis.grade_statistics.min, analysis.grade_statistics.max);
}

#[test]
fn no_runs_is_an_error() {
    assert!(analyze(&[]).is_err());
}

#[test]
fn display_lists_the_inconsistent_questions() {
    let runs = [
        run(vec![judged(1, 10, verdict(true, false, "right"))]),
        run(vec![judged(1, 10, verdict(false, true, "close"))]),
    ];

    let rendered = analyze(&runs).expect("analyze").to_string();

    assert!(rendered.contains("Consistency Analysis:"));
    assert!(rendered.contains("Number of runs: 2"));
    assert!(rendered.contains("Question 1 (max points: 10):"));
    assert!(rendered.contains("5/10 points: 1 times (50.0% of runs)"));
    assert!(rendered.contains("10/10 points: 1 times (50.0% of runs)"));
}

#[test]
fn consistent_runs_say_so_in_the_rendering() {
    let make = || run(vec![judged(1, 10, verdict(true, false, "right"))]);
    let rendered = analyze(&[make(), make()]).expect("analyze").to_string();

    assert!(rendered.contains("All questions were graded consistently across runs."));
}
