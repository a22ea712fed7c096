// A mounted page: its root element plus the teardown of its viewmodels

use web_sys::Element;

pub struct Page {
    pub element: Element,
    disposers: Vec<Box<dyn FnOnce()>>,
}

impl Page {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            disposers: Vec::new(),
        }
    }

    /// Run `dispose` when the page is replaced
    pub fn on_dispose<F>(&mut self, dispose: F)
    where
        F: FnOnce() + 'static,
    {
        self.disposers.push(Box::new(dispose));
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        for dispose in self.disposers.drain(..) {
            dispose();
        }
    }
}
