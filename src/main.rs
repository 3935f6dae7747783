//! Queens Rush entry point
//!
//! Handles platform-specific initialization and wires the DOM to the game
//! controller.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlInputElement, MouseEvent};

    use queens_rush::consts::*;
    use queens_rush::game::{Game, VerifyOutcome};
    use queens_rush::platform::{BrowserStorage, now_ms};

    /// Marker glyph rendered in an occupied cell
    const MARKER_GLYPH: &str = "\u{265B}";

    /// Repeating display timer. Cleared on Drop, so replacing or dropping
    /// the handle is guaranteed to stop the ticking.
    struct Interval {
        handle: i32,
        _closure: Closure<dyn FnMut()>,
    }

    impl Interval {
        fn every_second(closure: Closure<dyn FnMut()>) -> Option<Self> {
            let window = web_sys::window()?;
            let handle = window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    TIMER_TICK_MS,
                )
                .ok()?;
            Some(Self {
                handle,
                _closure: closure,
            })
        }
    }

    impl Drop for Interval {
        fn drop(&mut self) {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(self.handle);
            }
        }
    }

    /// App instance: the controller plus display-only concerns
    struct App {
        game: Game<BrowserStorage>,
        /// 1 Hz timer-display refresh; present only while a session runs
        tick: Option<Interval>,
        /// Click handlers for the current grid, replaced on rebuild
        cell_handlers: Vec<Closure<dyn FnMut(MouseEvent)>>,
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Queens Rush starting...");

        let Some(document) = document() else {
            log::error!("No document; cannot start");
            return;
        };

        let app = Rc::new(RefCell::new(App {
            game: Game::new(BrowserStorage),
            tick: None,
            cell_handlers: Vec::new(),
        }));

        build_board(&document, &app);
        setup_controls(&document, &app);
        {
            let a = app.borrow();
            render_hud(&document, &a.game);
            render_high_score(&document, &a.game);
        }

        log::info!("Queens Rush running!");
    }

    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    fn cell_id(row: usize, col: usize) -> String {
        format!("cell-{row}-{col}")
    }

    /// (Re)build the clickable grid for the current board dimension
    fn build_board(document: &Document, app: &Rc<RefCell<App>>) {
        let size = app.borrow().game.board().size();
        let Some(grid) = document.get_element_by_id("board") else {
            log::error!("No #board element");
            return;
        };
        grid.set_inner_html("");
        if let Some(grid_el) = grid.dyn_ref::<web_sys::HtmlElement>() {
            let _ = grid_el.style().set_property(
                "grid-template-columns",
                &format!("repeat({size}, {CELL_SIZE_PX}px)"),
            );
        }

        let mut handlers = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                let Ok(cell) = document.create_element("div") else {
                    continue;
                };
                let shade = if (row + col) % 2 == 0 { "light" } else { "dark" };
                let _ = cell.set_attribute("class", &format!("cell {shade}"));
                cell.set_id(&cell_id(row, col));

                let handler_app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    on_cell_click(&handler_app, row, col);
                });
                let _ = cell
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                handlers.push(closure);

                let _ = grid.append_child(&cell);
            }
        }

        // Old handlers belong to elements that no longer exist
        app.borrow_mut().cell_handlers = handlers;
    }

    fn on_cell_click(app: &Rc<RefCell<App>>, row: usize, col: usize) {
        let marked = { app.borrow_mut().game.toggle_marker(row, col) };
        // None means no active session; ignore the click
        let Some(marked) = marked else { return };
        let Some(document) = document() else { return };
        if let Some(cell) = document.get_element_by_id(&cell_id(row, col)) {
            cell.set_text_content(marked.then_some(MARKER_GLYPH));
        }
    }

    fn setup_controls(document: &Document, app: &Rc<RefCell<App>>) {
        // Board size selector
        if let Some(input) = document
            .get_element_by_id("board-size")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            let change_app = app.clone();
            let input_el = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let accepted = match input_el.value().trim().parse::<usize>() {
                    Ok(size) => {
                        let mut a = change_app.borrow_mut();
                        let changed = a.game.change_board_size(size);
                        if changed {
                            a.tick = None;
                        }
                        changed
                    }
                    Err(_) => false,
                };
                let Some(document) = document() else { return };
                if accepted {
                    build_board(&document, &change_app);
                    render_hud(&document, &change_app.borrow().game);
                } else {
                    // Snap the field back to the size actually in play
                    input_el.set_value(&change_app.borrow().game.board().size().to_string());
                }
            });
            let _ =
                input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Start button
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let start_app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let started = { start_app.borrow_mut().game.start(now_ms()) };
                if !started {
                    return;
                }

                let tick_app = start_app.clone();
                let tick = Closure::<dyn FnMut()>::new(move || {
                    let Some(document) = document() else { return };
                    render_timer(&document, &tick_app.borrow().game);
                });
                start_app.borrow_mut().tick = Interval::every_second(tick);

                let Some(document) = document() else { return };
                let a = start_app.borrow();
                paint_conflicts(&document, &a.game);
                render_hud(&document, &a.game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Verify button
        if let Some(btn) = document.get_element_by_id("verify-btn") {
            let verify_app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let outcome = {
                    let mut a = verify_app.borrow_mut();
                    let outcome = a.game.verify(now_ms());
                    if !matches!(outcome, VerifyOutcome::NotStarted) {
                        // The display tick stops with the clock
                        a.tick = None;
                    }
                    outcome
                };

                if let Some(document) = document() {
                    let a = verify_app.borrow();
                    paint_conflicts(&document, &a.game);
                    render_hud(&document, &a.game);
                    render_high_score(&document, &a.game);
                }

                match outcome {
                    VerifyOutcome::NotStarted => alert("Please start the game first!"),
                    VerifyOutcome::Solved { score, .. } => {
                        alert(&format!("Correct solution! Your score: {score:.2}"));
                    }
                    VerifyOutcome::Failed { .. } => {
                        alert("Incorrect solution. Conflicting markers are highlighted in red.");
                    }
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Reset button
        if let Some(btn) = document.get_element_by_id("reset-btn") {
            let reset_app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                {
                    let mut a = reset_app.borrow_mut();
                    a.game.reset();
                    a.tick = None;
                }
                let Some(document) = document() else { return };
                let a = reset_app.borrow();
                paint_board(&document, &a.game);
                paint_conflicts(&document, &a.game);
                render_hud(&document, &a.game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Reset high score button
        if let Some(btn) = document.get_element_by_id("reset-high-score-btn") {
            let clear_app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                clear_app.borrow_mut().game.reset_high_score();
                let Some(document) = document() else { return };
                render_high_score(&document, &clear_app.borrow().game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Repaint every cell's marker glyph from the board state
    fn paint_board(document: &Document, game: &Game<BrowserStorage>) {
        let board = game.board();
        for row in 0..board.size() {
            for col in 0..board.size() {
                let Some(cell) = document.get_element_by_id(&cell_id(row, col)) else {
                    continue;
                };
                cell.set_text_content(board.is_marked(row, col).then_some(MARKER_GLYPH));
            }
        }
    }

    /// Sync the `conflict` class on every cell with the controller's set
    fn paint_conflicts(document: &Document, game: &Game<BrowserStorage>) {
        let size = game.board().size();
        for row in 0..size {
            for col in 0..size {
                let Some(cell) = document.get_element_by_id(&cell_id(row, col)) else {
                    continue;
                };
                if game.conflicts().contains(&(row, col)) {
                    let _ = cell.class_list().add_1("conflict");
                } else {
                    let _ = cell.class_list().remove_1("conflict");
                }
            }
        }
    }

    fn render_timer(document: &Document, game: &Game<BrowserStorage>) {
        if let Some(el) = document.get_element_by_id("timer") {
            el.set_text_content(Some(&format!("Time: {}s", game.elapsed_secs(now_ms()))));
        }
    }

    fn render_score(document: &Document, game: &Game<BrowserStorage>) {
        if let Some(el) = document.get_element_by_id("score") {
            el.set_text_content(Some(&score_text(game.score())));
        }
    }

    fn render_hud(document: &Document, game: &Game<BrowserStorage>) {
        render_timer(document, game);
        render_score(document, game);
    }

    fn render_high_score(document: &Document, game: &Game<BrowserStorage>) {
        if let Some(el) = document.get_element_by_id("high-score") {
            el.set_text_content(Some(&format!(
                "Highest Score: {}",
                game.high_score().display()
            )));
        }
    }

    /// `Score: 0` before a verify, two decimals after a solve, the bare
    /// sentinel after a failure
    fn score_text(score: f64) -> String {
        if score == 0.0 {
            "Score: 0".to_string()
        } else if score < 0.0 {
            format!("Score: {score:.0}")
        } else {
            format!("Score: {score:.2}")
        }
    }

    fn alert(message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Queens Rush (native) starting...");
    log::info!("Native mode is a logic self-check - run with `trunk serve` for the web version");

    println!("\nRunning controller walkthrough...");
    walkthrough();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn walkthrough() {
    use queens_rush::game::{Game, VerifyOutcome};
    use queens_rush::platform::MemoryStore;

    let mut game = Game::with_board_size(4, MemoryStore::new());
    game.start(0.0);
    for (row, col) in [(0, 1), (1, 3), (2, 0), (3, 2)] {
        game.toggle_marker(row, col);
    }

    let outcome = game.verify(5_000.0);
    assert!(
        matches!(outcome, VerifyOutcome::Solved { .. }),
        "known 4x4 solution should verify: {outcome:?}"
    );
    assert!(game.high_score().is_set());
    println!("✓ Controller walkthrough passed!");
}
