use std::sync::{Arc, Mutex, PoisonError};

/// Where printed results and diagnostics go, one line per call.
pub trait Port {
    fn display(&mut self, text: &str);
}

impl Port for Vec<String> {
    fn display(&mut self, text: &str) {
        self.push(text.to_string());
    }
}

// Shared with the evaluator thread, so lines outlive a panic there.
impl Port for Arc<Mutex<Vec<String>>> {
    fn display(&mut self, text: &str) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
    }
}

#[test]
fn test_shared_lines() {
    let lines = Arc::new(Mutex::new(Vec::<String>::new()));
    let mut port = lines.clone();
    port.display("1");
    port.display("2");
    assert_eq!(*lines.lock().unwrap(), vec!["1".to_string(), "2".to_string()]);
}
