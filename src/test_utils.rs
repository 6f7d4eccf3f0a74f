#[cfg(test)]
pub mod test_helpers {
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::time::Instant;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    use crate::ai::{SuggestRequest, SuggestResponse};
    use crate::app::App;
    use crate::config::Config;
    use crate::session::SuggestionController;

    pub const TEMPLATE: &str = "\n# Please enter the commit message for your changes. Lines starting\n# with '#' will be ignored, and an empty message aborts the commit.\n";

    /// Editor app wired to test-held worker channels
    pub struct TestApp {
        pub app: App,
        pub requests: Receiver<SuggestRequest>,
        pub responses: Sender<SuggestResponse>,
        pub dir: TempDir,
    }

    impl TestApp {
        /// Answer the newest request with `text` and run one update
        pub fn respond(&mut self, text: &str) {
            let request = self
                .requests
                .try_iter()
                .last()
                .expect("a request was sent");
            self.responses
                .send(SuggestResponse {
                    buffer: request.buffer,
                    request_id: request.request_id,
                    result: Ok(text.to_string()),
                })
                .unwrap();
            self.app.update(Instant::now());
        }

        pub fn press(&mut self, key: KeyEvent) {
            self.app.handle_key_event(key);
        }

        pub fn type_str(&mut self, text: &str) {
            for c in text.chars() {
                self.press(key(KeyCode::Char(c)));
            }
        }

        pub fn lines(&self) -> Vec<String> {
            self.app.host.textarea().lines().to_vec()
        }
    }

    pub fn test_app(content: &str) -> TestApp {
        test_app_with_config(
            content,
            Config {
                auto_suggest: false,
                ..Default::default()
            },
        )
    }

    pub fn test_app_with_config(content: &str, config: Config) -> TestApp {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("COMMIT_EDITMSG");
        std::fs::write(&path, content).unwrap();

        let (request_tx, requests) = mpsc::channel();
        let (responses, response_rx) = mpsc::channel();
        let controller = SuggestionController::new(config, request_tx, response_rx);

        let mut app = App::open(&path, controller).unwrap();
        app.start(Instant::now());

        TestApp {
            app,
            requests,
            responses,
            dir,
        }
    }

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    pub fn key_with_mods(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }
}
