//! Event-stream driver shared by the XML-based extractors.
//!
//! Each format keeps its own small state machine implementing [`XmlHandler`];
//! this module only turns `quick-xml` events into calls on it. Element names
//! are passed without their namespace prefix.

use crate::error::Result;
use quick_xml::events::Event;
use quick_xml::Reader;

pub trait XmlHandler {
    fn start(&mut self, local_name: &[u8]);
    fn end(&mut self, local_name: &[u8]);
    fn text(&mut self, text: &str);
}

pub fn stream<H: XmlHandler>(data: &[u8], handler: &mut H) -> Result<()> {
    let mut reader = Reader::from_reader(data);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => handler.start(e.local_name().as_ref()),
            Event::Empty(e) => {
                let name = e.local_name();
                handler.start(name.as_ref());
                handler.end(name.as_ref());
            }
            Event::End(e) => handler.end(e.local_name().as_ref()),
            Event::Text(e) => match e.unescape() {
                Ok(text) => handler.text(&text),
                // undeclared entities: keep the raw text rather than fail
                Err(_) => handler.text(&String::from_utf8_lossy(&e)),
            },
            Event::CData(e) => handler.text(&String::from_utf8_lossy(&e)),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}
