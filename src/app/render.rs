use crate::core::aggregate::CheckoutSummary;
use crate::core::cart::{Cart, CART_CAPACITY};
use crate::core::display::{cross_listed_text, prerequisites_text, ratings_line, LOADING_PLACEHOLDER};
use crate::core::filter::{FilterState, LevelBucket, SortKey, ViewMode};
use crate::domain::model::CourseRecord;
use std::fmt::Write;

fn heading(course: &CourseRecord) -> String {
    format!(
        "{} {}: {}",
        course.id.department(),
        course.id.number(),
        course.title
    )
}

fn write_details(out: &mut String, course: &CourseRecord) {
    if let Some(prereqs) = &course.prerequisites {
        let _ = writeln!(out, "    Prereqs: {}", prerequisites_text(prereqs));
    }
    if let Some(cross) = cross_listed_text(course) {
        let _ = writeln!(out, "    {}", cross);
    }
    if !course.description.is_empty() {
        let _ = writeln!(out, "    {}", course.description);
    }
}

pub fn course_list(courses: &[CourseRecord], cart: &Cart, loading: bool) -> String {
    if courses.is_empty() {
        return "No courses match the current filters.\n".to_string();
    }

    let mut out = String::new();
    for course in courses {
        let marker = if cart.contains(&course.id) { "-" } else { "+" };
        let _ = writeln!(out, "[{}] {}", marker, heading(course));
        let _ = writeln!(out, "    {}", ratings_line(course, loading));
        write_details(&mut out, course);
    }
    out
}

pub fn cart_sidebar(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Course Cart\n  Your cart is currently empty!\n".to_string();
    }

    let mut out = format!("Course Cart ({}/{})\n", cart.len(), CART_CAPACITY);
    for course in cart.entries() {
        let _ = writeln!(out, "  ≡ {}", heading(course));
    }
    out
}

pub fn filter_summary(state: &FilterState) -> String {
    let levels: Vec<&str> = LevelBucket::ALL
        .iter()
        .filter(|b| state.bucket_active(**b))
        .map(|b| b.label())
        .collect();
    let sort = match state.sort_key {
        SortKey::Number => "number",
        SortKey::Quality => "quality",
        SortKey::Difficulty => "difficulty",
        SortKey::Workload => "workload",
        SortKey::None => "none",
    };
    let view = match state.view_mode {
        ViewMode::Catalog => "catalog",
        ViewMode::CartOnly => "cart",
    };

    format!(
        "search: {:?} | levels: {} | sort: {} | view: {}",
        state.search_text,
        if levels.is_empty() {
            "all".to_string()
        } else {
            levels.join(", ")
        },
        sort,
        view
    )
}

pub fn checkout(summary: &CheckoutSummary, loading: bool) -> String {
    if summary.entries.is_empty() {
        return "Checkout\n  Your cart is currently empty.\n".to_string();
    }

    let mut out = String::from("Checkout: Order Courses by Preference\n");
    for (title, course) in summary.numbered_titles().iter().zip(&summary.entries) {
        let _ = writeln!(out, "{}", title);
        let _ = writeln!(out, "    {}", ratings_line(course, loading));
        write_details(&mut out, course);
    }

    let _ = writeln!(out, "Averages");
    for avg in &summary.averages {
        if loading {
            let _ = writeln!(out, "  {}: {}", avg.metric.label(), LOADING_PLACEHOLDER);
            continue;
        }
        match avg.tier() {
            Some(tier) => {
                let _ = writeln!(
                    out,
                    "  {}: {:.2} [{}]",
                    avg.metric.label(),
                    avg.value,
                    tier.as_str()
                );
            }
            None => {
                let _ = writeln!(out, "  {}: {:.2}", avg.metric.label(), avg.value);
            }
        }
    }

    if summary.has_unavailable {
        let _ = writeln!(
            out,
            "Unavailable this term: {}",
            summary.unavailable_ids().join(", ")
        );
    }
    out
}
