use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::mock_test::QuestionWithOptions;

/// A `(question, selected option)` pair as submitted by a candidate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerChoice {
    pub question_id: Uuid,
    pub selected_option_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedAnswer {
    pub question_id: Uuid,
    pub selected_option_id: Uuid,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GradedSubmission {
    pub score: i32,
    pub answers: Vec<GradedAnswer>,
}

/// Scoring and ranking rules for multiple-choice mock tests. Pure functions;
/// persistence lives in `TestService`.
pub struct GradingService;

impl GradingService {
    pub fn total_points(questions: &[QuestionWithOptions]) -> i32 {
        questions.iter().map(|q| q.question.points).sum()
    }

    /// Grades submitted pairs against the test's questions.
    ///
    /// Pairs naming an unknown question, or an option that does not belong to
    /// the named question, are skipped. Only the first pair per question is
    /// graded, so the score can never exceed the test's total points.
    pub fn grade(questions: &[QuestionWithOptions], answers: &[AnswerChoice]) -> GradedSubmission {
        let mut seen: HashSet<Uuid> = HashSet::new();
        let mut graded = GradedSubmission::default();

        for choice in answers {
            let Some(entry) = questions
                .iter()
                .find(|q| q.question.id == choice.question_id)
            else {
                continue;
            };
            let Some(option) = entry
                .options
                .iter()
                .find(|o| o.id == choice.selected_option_id)
            else {
                continue;
            };
            if !seen.insert(choice.question_id) {
                continue;
            }

            if option.is_correct {
                graded.score += entry.question.points;
            }
            graded.answers.push(GradedAnswer {
                question_id: choice.question_id,
                selected_option_id: option.id,
                is_correct: option.is_correct,
            });
        }

        graded
    }

    pub fn has_passed(score: i32, passing_score: i32) -> bool {
        score >= passing_score
    }

    /// `score / total_points * 100` rounded to two decimals, or zero for an
    /// empty test.
    pub fn percentage(score: i32, total_points: i32) -> Decimal {
        if total_points <= 0 {
            return Decimal::ZERO;
        }
        (Decimal::from(score) * Decimal::ONE_HUNDRED / Decimal::from(total_points)).round_dp(2)
    }

    /// Orders by score descending and pairs each item with its 1-based rank.
    /// The sort is stable: equal scores keep their input order.
    pub fn rank<T>(mut items: Vec<T>, score_of: impl Fn(&T) -> i32) -> Vec<(i32, T)> {
        items.sort_by(|a, b| score_of(b).cmp(&score_of(a)));
        items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| ((idx as i32) + 1, item))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::mock_test::{TestQuestion, TestQuestionOption};
    use rust_decimal::prelude::ToPrimitive;

    fn question(points: i32, order_index: i32) -> (QuestionWithOptions, Uuid, Uuid) {
        let test_id = Uuid::nil();
        let q = TestQuestion {
            id: Uuid::new_v4(),
            mock_test_id: test_id,
            question_text: format!("Question {}", order_index),
            points,
            order_index,
        };
        let right = TestQuestionOption {
            id: Uuid::new_v4(),
            question_id: q.id,
            option_text: "right".into(),
            is_correct: true,
            order_index: 0,
        };
        let wrong = TestQuestionOption {
            id: Uuid::new_v4(),
            question_id: q.id,
            option_text: "wrong".into(),
            is_correct: false,
            order_index: 1,
        };
        let (right_id, wrong_id) = (right.id, wrong.id);
        (
            QuestionWithOptions {
                question: q,
                options: vec![right, wrong],
            },
            right_id,
            wrong_id,
        )
    }

    fn pick(q: &QuestionWithOptions, option_id: Uuid) -> AnswerChoice {
        AnswerChoice {
            question_id: q.question.id,
            selected_option_id: option_id,
        }
    }

    #[test]
    fn first_two_of_ten_five_five_scores_fifteen() {
        let (q1, q1_right, _) = question(10, 0);
        let (q2, q2_right, _) = question(5, 1);
        let (q3, _, q3_wrong) = question(5, 2);
        let answers = vec![pick(&q1, q1_right), pick(&q2, q2_right), pick(&q3, q3_wrong)];
        let questions = vec![q1, q2, q3];

        assert_eq!(GradingService::total_points(&questions), 20);

        let graded = GradingService::grade(&questions, &answers);
        assert_eq!(graded.score, 15);
        assert_eq!(graded.answers.len(), 3);
        assert!(!graded.answers[2].is_correct);
        assert!(GradingService::has_passed(graded.score, 15));
        assert!(!GradingService::has_passed(graded.score, 16));
    }

    #[test]
    fn unknown_question_or_foreign_option_is_skipped() {
        let (q1, q1_right, _) = question(10, 0);
        let (q2, q2_right, _) = question(5, 1);
        let answers = vec![
            AnswerChoice {
                question_id: Uuid::new_v4(),
                selected_option_id: q1_right,
            },
            // option of q2 submitted against q1
            pick(&q1, q2_right),
        ];
        let graded = GradingService::grade(&[q1, q2], &answers);
        assert_eq!(graded.score, 0);
        assert!(graded.answers.is_empty());
    }

    #[test]
    fn repeated_question_is_graded_once() {
        let (q1, right, wrong) = question(10, 0);
        let answers = vec![pick(&q1, wrong), pick(&q1, right), pick(&q1, right)];
        let graded = GradingService::grade(&[q1], &answers);
        assert_eq!(graded.score, 0);
        assert_eq!(graded.answers.len(), 1);
    }

    #[test]
    fn score_never_exceeds_total_points() {
        let (q1, right, _) = question(7, 0);
        let answers = vec![pick(&q1, right); 5];
        let total = q1.question.points;
        let graded = GradingService::grade(&[q1], &answers);
        assert!(graded.score <= total);
    }

    #[test]
    fn percentage_rounds_to_two_places_and_guards_zero() {
        assert_eq!(GradingService::percentage(15, 20).to_f64(), Some(75.0));
        assert_eq!(GradingService::percentage(2, 3).to_string(), "66.67");
        assert_eq!(GradingService::percentage(1, 3).to_string(), "33.33");
        assert_eq!(GradingService::percentage(0, 0), Decimal::ZERO);
        assert_eq!(GradingService::percentage(5, 0), Decimal::ZERO);
    }

    #[test]
    fn rank_is_strict_and_consistent_with_score() {
        let items = vec![("a", 5), ("b", 20), ("c", 12), ("d", 12), ("e", 0)];
        let ranked = GradingService::rank(items, |item| item.1);
        let ranks: Vec<i32> = ranked.iter().map(|(r, _)| *r).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
        let names: Vec<&str> = ranked.iter().map(|(_, item)| item.0).collect();
        assert_eq!(names, vec!["b", "c", "d", "a", "e"]);
        for pair in ranked.windows(2) {
            assert!(pair[0].1 .1 >= pair[1].1 .1);
        }
    }

    #[test]
    fn rank_of_empty_list_is_empty() {
        let ranked = GradingService::rank(Vec::<i32>::new(), |s| *s);
        assert!(ranked.is_empty());
    }
}
