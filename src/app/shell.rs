use crate::app::render;
use crate::core::cart::AddOutcome;
use crate::core::cart_query;
use crate::core::drag::{Bounds, ListLayout};
use crate::core::filter::{LevelBucket, SortKey};
use crate::core::session::{Action, ActionOutcome, ConfirmOutcome, ConfirmPrompt, Session};
use crate::domain::model::{CourseId, RatingRecord};
use crate::utils::error::Result;
use std::io::{BufRead, Write};

/// 購物車列表每列高度與可見區域（像素）
pub const ROW_HEIGHT: f64 = 40.0;
pub const VIEWPORT_HEIGHT: f64 = 200.0;

const HELP: &str = "\
commands:
  search [text]        set search text (empty clears)
  level <intro|regular|upper>
  sort <number|quality|difficulty|workload>   selecting the active key clears it
  view                 toggle catalog / cart-only view
  list                 show visible courses
  add <ID> | remove <ID>
  cart                 show the cart
  drag <ID>            start dragging a cart entry
  over <y>             pointer moved to y (rows are 40px, list viewport is 200px)
  drop                 release the dragged entry
  cancel               abort the drag and restore the previous order
  clear                empty the cart
  checkout             review cart statistics
  confirm              confirm course selection
  query                print the cart query string
  quit
";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Act(Action),
    PointerAt(f64),
    List,
    ShowCart,
    Checkout,
    Query,
    Help,
    Quit,
}

fn parse_id(arg: Option<&str>) -> std::result::Result<CourseId, String> {
    let arg = arg.ok_or_else(|| "missing course id".to_string())?;
    arg.parse::<CourseId>().map_err(|e| e.to_string())
}

fn parse_command(line: &str) -> std::result::Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    let arg = (!rest.is_empty()).then_some(rest);

    let command = match name {
        "search" => Command::Act(Action::SetSearch(rest.to_string())),
        "level" => {
            let bucket = arg
                .and_then(LevelBucket::parse)
                .ok_or_else(|| "expected intro, regular or upper".to_string())?;
            Command::Act(Action::ToggleBucket(bucket))
        }
        "sort" => {
            let key = arg
                .and_then(SortKey::parse)
                .ok_or_else(|| "expected number, quality, difficulty or workload".to_string())?;
            Command::Act(Action::SelectSort(key))
        }
        "view" => Command::Act(Action::ToggleView),
        "add" => Command::Act(Action::Add(parse_id(arg)?)),
        "remove" => Command::Act(Action::Remove(parse_id(arg)?)),
        "drag" => Command::Act(Action::DragStart(parse_id(arg)?)),
        "over" => {
            let y = arg
                .and_then(|v| v.parse::<f64>().ok())
                .ok_or_else(|| "expected a pointer position".to_string())?;
            Command::PointerAt(y)
        }
        "drop" => Command::Act(Action::Drop),
        "cancel" => Command::Act(Action::CancelDrag),
        "clear" => Command::Act(Action::ClearCart),
        "confirm" => Command::Act(Action::ConfirmCheckout),
        "list" => Command::List,
        "cart" => Command::ShowCart,
        "checkout" => Command::Checkout,
        "query" => Command::Query,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(Some(command))
}

/// 確認提示的回答來自下一行輸入：先以「拒絕」試一次（不改變狀態），
/// 記下要詢問的課程，再由使用者回答後重新確認。
struct PendingAnswer {
    answer: Option<bool>,
    asked: Option<Vec<String>>,
}

impl ConfirmPrompt for PendingAnswer {
    fn confirm_unavailable(&mut self, unavailable: &[String]) -> bool {
        self.asked = Some(unavailable.to_vec());
        self.answer.unwrap_or(false)
    }
}

/// 逐行指令操作 session
pub struct Shell<W> {
    session: Session,
    layout: ListLayout,
    output: W,
    awaiting_confirmation: bool,
}

impl<W: Write> Shell<W> {
    pub fn new(session: Session, output: W) -> Self {
        Self {
            session,
            layout: ListLayout::new(ROW_HEIGHT, Bounds::new(0.0, VIEWPORT_HEIGHT)),
            output,
            awaiting_confirmation: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn greet(&mut self) -> Result<()> {
        writeln!(self.output, "Type 'help' for commands.")?;
        self.prompt()
    }

    pub fn prompt(&mut self) -> Result<()> {
        write!(self.output, "> ")?;
        self.output.flush()?;
        Ok(())
    }

    /// 同步讀取所有輸入直到結束或 quit
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        self.greet()?;
        for line in input.lines() {
            if !self.execute(&line?)? {
                break;
            }
            self.prompt()?;
        }
        Ok(())
    }

    /// 執行一行指令；回傳 false 表示結束
    pub fn execute(&mut self, line: &str) -> Result<bool> {
        self.session.tick();

        if self.awaiting_confirmation {
            self.awaiting_confirmation = false;
            let accepted = matches!(line.trim(), "y" | "Y" | "yes");
            self.confirm(Some(accepted))?;
            self.show_notification()?;
            return Ok(true);
        }

        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(true),
            Err(message) => {
                writeln!(self.output, "{}", message)?;
                return Ok(true);
            }
        };

        match command {
            Command::Quit => return Ok(false),
            Command::Help => write!(self.output, "{}", HELP)?,
            Command::List => {
                writeln!(self.output, "{}", render::filter_summary(self.session.filter()))?;
                let visible = self.session.visible();
                write!(
                    self.output,
                    "{}",
                    render::course_list(&visible, self.session.cart(), self.session.is_loading())
                )?;
            }
            Command::ShowCart => write!(self.output, "{}", render::cart_sidebar(self.session.cart()))?,
            Command::Checkout => write!(
                self.output,
                "{}",
                render::checkout(&self.session.checkout_summary(), self.session.is_loading())
            )?,
            Command::Query => writeln!(
                self.output,
                "cart={}",
                cart_query::to_query(&self.session.cart().ids())
            )?,
            Command::PointerAt(y) => self.pointer_at(y)?,
            Command::Act(Action::ConfirmCheckout) => self.confirm(None)?,
            Command::Act(action) => self.act(action)?,
        }

        self.show_notification()?;
        Ok(true)
    }

    /// 評分載入完成後呼叫
    pub fn ratings_loaded(&mut self, ratings: Vec<RatingRecord>) -> Result<()> {
        self.session.apply_ratings(ratings);
        writeln!(self.output, "(ratings loaded)")?;
        Ok(())
    }

    fn show_notification(&mut self) -> Result<()> {
        if let Some(message) = self.session.notification() {
            writeln!(self.output, "** {} **", message)?;
        }
        Ok(())
    }

    fn confirm(&mut self, answer: Option<bool>) -> Result<()> {
        let mut prompt = PendingAnswer {
            answer,
            asked: None,
        };
        match self.session.confirm_checkout(&mut prompt) {
            ConfirmOutcome::Confirmed(summary) => write!(
                self.output,
                "{}",
                render::checkout(&summary, self.session.is_loading())
            )?,
            ConfirmOutcome::EmptyCart => writeln!(self.output, "Your cart is currently empty.")?,
            ConfirmOutcome::RatingsLoading => writeln!(
                self.output,
                "Ratings are still loading, confirm again once they arrive."
            )?,
            ConfirmOutcome::Declined => match (answer, prompt.asked) {
                (None, Some(unavailable)) => {
                    writeln!(
                        self.output,
                        "{} not offered this term. Confirm anyway? [y/N]",
                        unavailable.join(", ")
                    )?;
                    self.awaiting_confirmation = true;
                }
                _ => writeln!(self.output, "Checkout cancelled")?,
            },
        }
        Ok(())
    }

    fn pointer_at(&mut self, y: f64) -> Result<()> {
        let rows = self.session.cart().len();
        let Some((index, bounds)) = self.layout.hit_test(y, rows) else {
            return Ok(());
        };
        let target = self.session.cart().entries()[index].id.clone();
        let action = Action::DragOver {
            target,
            pointer_y: y,
            target_bounds: bounds,
            viewport: self.layout.viewport,
        };
        self.act(action)
    }

    fn act(&mut self, action: Action) -> Result<()> {
        let mut prompt = PendingAnswer {
            answer: Some(false),
            asked: None,
        };
        let outcome = match self.session.dispatch(action, &mut prompt) {
            Ok(outcome) => outcome,
            Err(e) => {
                writeln!(self.output, "{}", e.user_friendly_message())?;
                return Ok(());
            }
        };

        match outcome {
            ActionOutcome::Added(AddOutcome::Added) | ActionOutcome::Removed(true) => {
                write!(self.output, "{}", render::cart_sidebar(self.session.cart()))?
            }
            ActionOutcome::Added(AddOutcome::AlreadyInCart) => {
                writeln!(self.output, "Already in cart")?
            }
            ActionOutcome::Removed(false) => writeln!(self.output, "Not in cart")?,
            ActionOutcome::Dragged(update) => {
                if let Some(direction) = update.scroll {
                    self.layout.scroll(direction, self.session.cart().len());
                }
                if update.moved {
                    write!(self.output, "{}", render::cart_sidebar(self.session.cart()))?;
                }
            }
            ActionOutcome::Added(AddOutcome::LimitExceeded)
            | ActionOutcome::Checkout(_)
            | ActionOutcome::Updated => {}
        }
        Ok(())
    }
}
