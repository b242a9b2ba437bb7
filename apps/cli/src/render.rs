use client_core::{
    ordering::{DISPLAY_NAME, SELF_PACED},
    CourseRow, OrderingKey, SortIndicator, ViewSnapshot,
};

const PAGE_WINDOW_SPAN: u32 = 2;

fn header_label(label: &str, ordering: &OrderingKey, field: &str) -> String {
    match ordering.indicator_for(field) {
        SortIndicator::Ascending => format!("{label} ^"),
        SortIndicator::Descending => format!("{label} v"),
        SortIndicator::Inactive => label.to_string(),
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}

pub fn render_pager(snapshot: &ViewSnapshot) -> Option<String> {
    if !snapshot.can_navigate() {
        return None;
    }
    let pages: Vec<String> = snapshot
        .page_window(PAGE_WINDOW_SPAN)
        .into_iter()
        .map(|page| {
            if page == snapshot.current_page {
                format!("[{page}]")
            } else {
                page.to_string()
            }
        })
        .collect();
    Some(format!(
        "{} {} {}  (page {} of {}, {} per page)",
        if snapshot.has_previous() { "<" } else { " " },
        pages.join(" "),
        if snapshot.has_next() { ">" } else { " " },
        snapshot.current_page,
        snapshot.pages,
        snapshot.per_page,
    ))
}

pub fn render_page(snapshot: &ViewSnapshot) -> String {
    let mut out = Vec::new();
    out.push(format!("Courses list. {}", snapshot.summary()));
    if !snapshot.search_query.is_empty() {
        out.push(format!("Search: {}", snapshot.search_query));
    }
    if let Some(failure) = &snapshot.last_error {
        out.push(format!("Last load failed ({:?}): {}", failure.kind, failure.message));
    }

    let pager = render_pager(snapshot);
    if let Some(pager) = &pager {
        out.push(pager.clone());
    }

    out.push(format!(
        "{:<40} {:<36} {:<30} {:<12} {:>10} {:>11}",
        header_label("Course name", &snapshot.ordering, DISPLAY_NAME),
        "Course ID",
        "Course start",
        header_label("Self paced", &snapshot.ordering, SELF_PACED),
        "Enrolments",
        "Completions",
    ));
    for course in snapshot.items.iter() {
        let row = CourseRow::from(course);
        out.push(format!(
            "{:<40} {:<36} {:<30} {:<12} {:>10} {:>11}",
            truncate(&row.course_name, 40),
            truncate(&row.course_id, 36),
            truncate(&row.start_date, 30),
            row.self_paced,
            row.enrollments,
            row.completions,
        ));
    }

    if let Some(pager) = pager {
        out.push(pager);
    }
    out.join("\n")
}
