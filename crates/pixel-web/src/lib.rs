pub mod runner;

pub use runner::GameRunner;

// Re-exported for `export_game!` expansions.
pub use js_sys;

/// Route `log` output to the browser console and panics to `console.error`.
/// Safe to call more than once.
pub fn init_logging(level: log::Level) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(level);
}

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - wasm-bindgen exports (game_init, game_tick, framebuffer accessors, camera and shake controls)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use pixel_engine::*;
///
/// mod game;
/// use game::MyGame;
///
/// pixel_web::export_game!(MyGame, "my-game");
/// ```
///
/// The host calls `game_init(sheets)` with the concatenated sheet texts, then
/// `game_tick(dt)` every animation frame, and re-uploads the canvas whenever
/// `get_frame_generation()` changes.
///
/// # Arguments
///
/// - `$game_type`: The game struct type that implements `pixel_engine::Game`
/// - `$game_name`: A string literal used in the initialization log message
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Game not initialized. Call game_init() first.");
                f(runner)
            })
        }

        #[wasm_bindgen]
        pub fn game_init(sheets: &str) {
            $crate::init_logging(log::Level::Info);

            let game = <$game_type>::new();
            let runner = $crate::GameRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            let loaded = with_runner(|r| {
                let loaded = r.load_sheets(sheets);
                r.init();
                loaded
            });
            log::info!("{}: initialized with {} animations", $game_name, loaded);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_set_camera(x: i32, y: i32) {
            with_runner(|r| r.set_camera(x, y));
        }

        #[wasm_bindgen]
        pub fn game_set_shake(amount: i32) {
            with_runner(|r| r.set_shake(amount));
        }

        // ---- Framebuffer accessors ----

        #[wasm_bindgen]
        pub fn get_pixels_ptr() -> *const u8 {
            with_runner(|r| r.pixels_ptr())
        }

        #[wasm_bindgen]
        pub fn get_pixels_len() -> u32 {
            with_runner(|r| r.pixels_len())
        }

        /// Copy of the last presented frame, ready for `new ImageData(...)`.
        #[wasm_bindgen]
        pub fn get_pixels() -> $crate::js_sys::Uint8ClampedArray {
            with_runner(|r| $crate::js_sys::Uint8ClampedArray::from(r.pixels()))
        }

        #[wasm_bindgen]
        pub fn get_frame_generation() -> u32 {
            with_runner(|r| r.frame_generation())
        }

        #[wasm_bindgen]
        pub fn get_width() -> u32 {
            with_runner(|r| r.width())
        }

        #[wasm_bindgen]
        pub fn get_height() -> u32 {
            with_runner(|r| r.height())
        }
    };
}
