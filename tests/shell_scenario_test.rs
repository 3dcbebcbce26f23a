use course_cart::app::shell::Shell;
use course_cart::core::notice::{CART_LIMIT_MESSAGE, CONFIRMED_MESSAGE};
use course_cart::core::{CatalogEntry, CourseId, RatingRecord};
use course_cart::{Catalog, Session};

fn catalog(numbers: &[u32]) -> Catalog {
    Catalog::new(
        numbers
            .iter()
            .map(|n| CatalogEntry {
                dept: "CIS".to_string(),
                number: *n,
                title: format!("Course {}", n),
                description: String::new(),
                prereqs: None,
                cross_listed: None,
            })
            .collect(),
    )
    .unwrap()
}

fn rating(number: u32, quality: f64, difficulty: f64) -> RatingRecord {
    RatingRecord {
        id: CourseId::new("CIS", number),
        title: Some(format!("Course {}", number)),
        description: None,
        course_quality: Some(quality),
        difficulty: Some(difficulty),
        work_required: None,
    }
}

/// 依序執行指令，回傳完整輸出與最後的 session
fn run_lines(session: Session, lines: &[&str]) -> (String, Session) {
    let mut output = Vec::new();
    let session = {
        let mut shell = Shell::new(session, &mut output);
        for line in lines {
            if !shell.execute(line).unwrap() {
                break;
            }
        }
        shell.into_session()
    };
    (String::from_utf8(output).unwrap(), session)
}

#[test]
fn test_browse_filter_and_sort() {
    let mut session = Session::new(catalog(&[120, 160, 240, 380, 450]));
    session.apply_ratings(vec![
        rating(120, 2.8, 2.5),
        rating(160, 3.5, 3.6),
        rating(380, 3.1, 3.9),
        rating(450, 3.3, 2.0),
    ]);

    let (output, session) = run_lines(session, &["level upper", "sort quality", "list"]);

    let listed: Vec<&str> = output
        .lines()
        .filter(|line| line.starts_with("[+]"))
        .collect();
    assert_eq!(listed, vec!["[+] CIS 450: Course 450", "[+] CIS 380: Course 380"]);

    // 再選一次同一個排序即取消排序
    let (output, _) = run_lines(session, &["sort quality", "level upper", "list"]);
    let listed: Vec<&str> = output
        .lines()
        .filter(|line| line.starts_with("[+]"))
        .collect();
    assert_eq!(listed.len(), 5);
    assert_eq!(listed[0], "[+] CIS 120: Course 120");
    assert!(output.contains("Unavailable this term"));
}

#[test]
fn test_cart_limit_notification() {
    let numbers: Vec<u32> = (1..=8).map(|n| 100 + n).collect();
    let mut session = Session::new(catalog(&numbers));
    session.apply_ratings(Vec::new());

    let commands: Vec<String> = numbers.iter().map(|n| format!("add CIS-{}", n)).collect();
    let lines: Vec<&str> = commands.iter().map(String::as_str).collect();
    let (output, session) = run_lines(session, &lines);

    assert_eq!(session.cart().len(), 7);
    assert!(!session.cart().contains(&CourseId::new("CIS", 108)));
    assert!(output.contains(&format!("** {} **", CART_LIMIT_MESSAGE)));
    assert!(output.contains("Course Cart (7/7)"));
}

#[test]
fn test_reorder_then_checkout_keeps_preference_order() {
    let mut session = Session::new(catalog(&[120, 160, 240]));
    session.apply_ratings(vec![
        rating(120, 3.0, 3.0),
        rating(160, 2.0, 2.0),
        rating(240, 4.0, 1.0),
    ]);

    let (output, session) = run_lines(
        session,
        &[
            "add CIS-120",
            "add CIS-160",
            "add CIS-240",
            // 第一列拖到最後一列的下半部
            "drag CIS-120",
            "over 65",
            "over 105",
            "drop",
            "query",
            "checkout",
        ],
    );

    assert!(output.contains("cart=CIS-160+CIS-240+CIS-120"));
    assert!(output.contains("1. CIS 160: Course 160"));
    assert!(output.contains("3. CIS 120: Course 120"));
    assert!(output.contains("  Course Quality: 3.00 [mid]"));
    assert!(session.cart().dragging().is_none());
}

#[test]
fn test_confirm_with_unavailable_course_asks_first() {
    let mut session = Session::new(catalog(&[120, 160]));
    session.apply_ratings(vec![rating(160, 3.0, 3.0)]);

    let (output, session) = run_lines(session, &["add CIS-120", "add CIS-160", "confirm", "n"]);
    assert!(output.contains("CIS-120 not offered this term. Confirm anyway? [y/N]"));
    assert!(output.contains("Checkout cancelled"));
    assert!(!output.contains(CONFIRMED_MESSAGE));
    assert_eq!(session.cart().len(), 2);

    let (output, _) = run_lines(session, &["confirm", "y"]);
    assert!(output.contains(&format!("** {} **", CONFIRMED_MESSAGE)));
}

#[test]
fn test_commands_work_while_ratings_load() {
    let session = Session::new(catalog(&[120, 160]));

    let (output, mut session) = run_lines(session, &["add CIS-160", "checkout"]);
    assert!(session.is_loading());
    assert!(output.contains("Course Quality: Loading..."));

    session.apply_ratings(vec![rating(160, 3.4, 2.1)]);
    let (output, _) = run_lines(session, &["checkout"]);
    assert!(output.contains("  Course Quality: 3.40 [high]"));
    assert!(output.contains("  Difficulty: 2.10 [high]"));
}
