//! Seeds demo divisions, questions and tests. Safe to run repeatedly:
//! rows are matched by name/text before inserting.

use anyhow::Result;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use assessment_backend::config::Config;
use assessment_backend::database::pool::create_pool;
use assessment_backend::models::question::QuestionType;

struct SeedQuestion {
    question_type: QuestionType,
    question_text: &'static str,
    options: Option<serde_json::Value>,
    correct_answer: Option<&'static str>,
    media_url: Option<&'static str>,
    marks: i64,
    difficulty: &'static str,
}

async fn seed_divisions(pool: &PgPool) -> Result<()> {
    let divisions = [
        ("Data Annotator", "Data labeling and annotation specialists"),
        ("QA Analyst", "Quality assurance and testing professionals"),
        ("Content Moderator", "Content review and moderation specialists"),
        ("Image Analyst", "Image processing and analysis experts"),
        ("Video Analyst", "Video annotation and analysis professionals"),
    ];

    for (name, description) in divisions {
        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM divisions WHERE name = $1")
                .bind(name)
                .fetch_optional(pool)
                .await?;
        if existing.is_none() {
            sqlx::query("INSERT INTO divisions (name, description) VALUES ($1, $2)")
                .bind(name)
                .bind(description)
                .execute(pool)
                .await?;
            println!("Created division: {}", name);
        }
    }
    Ok(())
}

async fn seed_questions(pool: &PgPool) -> Result<()> {
    let questions = vec![
        SeedQuestion {
            question_type: QuestionType::Mcq,
            question_text: "What is the output of print(2 ** 3)?",
            options: Some(serde_json::json!(["6", "8", "9", "5"])),
            correct_answer: Some("8"),
            media_url: None,
            marks: 1,
            difficulty: "easy",
        },
        SeedQuestion {
            question_type: QuestionType::Mcq,
            question_text: "Which HTML tag is used for creating a hyperlink?",
            options: Some(serde_json::json!(["<link>", "<a>", "<href>", "<url>"])),
            correct_answer: Some("<a>"),
            media_url: None,
            marks: 1,
            difficulty: "easy",
        },
        SeedQuestion {
            question_type: QuestionType::Mcq,
            question_text: "What is the time complexity of binary search?",
            options: Some(serde_json::json!(["O(n)", "O(log n)", "O(n^2)", "O(1)"])),
            correct_answer: Some("O(log n)"),
            media_url: None,
            marks: 2,
            difficulty: "medium",
        },
        SeedQuestion {
            question_type: QuestionType::Mcq,
            question_text: "Which data structure uses LIFO order?",
            options: Some(serde_json::json!(["Queue", "Stack", "Linked List", "Tree"])),
            correct_answer: Some("Stack"),
            media_url: None,
            marks: 1,
            difficulty: "easy",
        },
        SeedQuestion {
            question_type: QuestionType::Mcq,
            question_text: "What is the default port for HTTPS?",
            options: Some(serde_json::json!(["80", "443", "8080", "3000"])),
            correct_answer: Some("443"),
            media_url: None,
            marks: 1,
            difficulty: "easy",
        },
        SeedQuestion {
            question_type: QuestionType::TextAnnotation,
            question_text: "Identify and label all the named entities (person, organization, location) in the following text: 'John Smith works at Google in Mountain View.'",
            options: None,
            correct_answer: None,
            media_url: None,
            marks: 5,
            difficulty: "medium",
        },
        SeedQuestion {
            question_type: QuestionType::ImageAnnotation,
            question_text: "Draw bounding boxes around all vehicles in the image.",
            options: None,
            correct_answer: None,
            media_url: Some("https://images.unsplash.com/photo-1449824913935-59a10b8d2000"),
            marks: 10,
            difficulty: "medium",
        },
    ];

    for q in questions {
        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM questions WHERE question_text = $1")
                .bind(q.question_text)
                .fetch_optional(pool)
                .await?;
        if existing.is_none() {
            sqlx::query(
                r#"
                INSERT INTO questions (question_type, question_text, options,
                                       correct_answer, media_url, marks, difficulty)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(q.question_type)
            .bind(q.question_text)
            .bind(&q.options)
            .bind(q.correct_answer)
            .bind(q.media_url)
            .bind(Decimal::from(q.marks))
            .bind(q.difficulty)
            .execute(pool)
            .await?;
            println!("Created question: {}", &q.question_text[..q.question_text.len().min(50)]);
        }
    }
    Ok(())
}

async fn seed_tests(pool: &PgPool) -> Result<()> {
    struct SeedTest {
        title: &'static str,
        description: &'static str,
        division: &'static str,
        duration_minutes: i32,
        total_questions: i32,
        total_marks: i64,
        passing_marks: i64,
        mcq_count: i32,
        image_annotation_count: i32,
    }

    let tests = [
        SeedTest {
            title: "Data Annotation Basics",
            description: "Basic assessment for data annotation skills",
            division: "Data Annotator",
            duration_minutes: 30,
            total_questions: 5,
            total_marks: 6,
            passing_marks: 3,
            mcq_count: 5,
            image_annotation_count: 0,
        },
        SeedTest {
            title: "Image Labeling Assessment",
            description: "Test your image annotation skills",
            division: "Image Analyst",
            duration_minutes: 45,
            total_questions: 4,
            total_marks: 15,
            passing_marks: 7,
            mcq_count: 3,
            image_annotation_count: 1,
        },
    ];

    for t in tests {
        let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM tests WHERE title = $1")
            .bind(t.title)
            .fetch_optional(pool)
            .await?;
        if existing.is_some() {
            continue;
        }
        let division_id: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM divisions WHERE name = $1")
                .bind(t.division)
                .fetch_optional(pool)
                .await?;
        sqlx::query(
            r#"
            INSERT INTO tests (title, description, division_id, duration_minutes,
                               total_questions, total_marks, passing_marks,
                               mcq_count, image_annotation_count, is_published)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, TRUE)
            "#,
        )
        .bind(t.title)
        .bind(t.description)
        .bind(division_id.map(|(id,)| id))
        .bind(t.duration_minutes)
        .bind(t.total_questions)
        .bind(Decimal::from(t.total_marks))
        .bind(Decimal::from(t.passing_marks))
        .bind(t.mcq_count)
        .bind(t.image_annotation_count)
        .execute(pool)
        .await?;
        println!("Created test: {}", t.title);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("Starting test data seeding...");

    let config = Config::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    seed_divisions(&pool).await?;
    seed_questions(&pool).await?;
    seed_tests(&pool).await?;

    println!("Test data seeding completed!");
    Ok(())
}
