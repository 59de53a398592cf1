use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::question::Question;
use crate::models::test::Test;

/// Assembles the question set for a test session. Implementations are
/// selected per test: explicit links win, composition sampling is the
/// fallback.
#[async_trait]
pub trait QuestionSetResolver: Send + Sync {
    fn name(&self) -> &'static str;
    async fn resolve(&self, pool: &PgPool, test: &Test) -> Result<Vec<Question>>;
}

/// Delivers the questions an admin explicitly linked to the test,
/// ordered by link position.
pub struct ExplicitLinkResolver;

#[async_trait]
impl QuestionSetResolver for ExplicitLinkResolver {
    fn name(&self) -> &'static str {
        "explicit_links"
    }

    async fn resolve(&self, pool: &PgPool, test: &Test) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT q.*
            FROM questions q
            JOIN test_questions tq ON tq.question_id = q.id
            WHERE tq.test_id = $1
            ORDER BY tq.position ASC
            "#,
        )
        .bind(test.id)
        .fetch_all(pool)
        .await?;
        Ok(questions)
    }
}

/// Pulls up to `count` active questions per type, in declared type
/// order. Intra-type ordering is whatever the store returns, and
/// nothing excludes questions a user saw in an earlier attempt; a
/// resumed session may receive a different sample.
pub struct CompositionSampleResolver;

#[async_trait]
impl QuestionSetResolver for CompositionSampleResolver {
    fn name(&self) -> &'static str {
        "composition_sample"
    }

    async fn resolve(&self, pool: &PgPool, test: &Test) -> Result<Vec<Question>> {
        let mut questions = Vec::new();
        for (question_type, count) in test.composition() {
            if count <= 0 {
                continue;
            }
            let batch = sqlx::query_as::<_, Question>(
                r#"
                SELECT * FROM questions
                WHERE question_type = $1 AND is_active = TRUE
                LIMIT $2
                "#,
            )
            .bind(question_type)
            .bind(count as i64)
            .fetch_all(pool)
            .await?;
            questions.extend(batch);
        }
        Ok(questions)
    }
}

pub fn select_resolver(has_explicit_links: bool) -> Box<dyn QuestionSetResolver> {
    if has_explicit_links {
        Box::new(ExplicitLinkResolver)
    } else {
        Box::new(CompositionSampleResolver)
    }
}

pub async fn resolve_question_set(pool: &PgPool, test: &Test) -> Result<Vec<Question>> {
    let link_count: i64 =
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM test_questions WHERE test_id = $1"#)
            .bind(test.id)
            .fetch_one(pool)
            .await?;

    let resolver = select_resolver(link_count > 0);
    tracing::debug!(test_id = %test.id, resolver = resolver.name(), "resolving question set");
    resolver.resolve(pool, test).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_links_win_over_sampling() {
        assert_eq!(select_resolver(true).name(), "explicit_links");
        assert_eq!(select_resolver(false).name(), "composition_sample");
    }
}
