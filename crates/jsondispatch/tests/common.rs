#![allow(missing_docs)]
#![allow(dead_code)]

use std::{cell::RefCell, fmt::Write, rc::Rc};

use jsondispatch::{HandlerError, JsonHandler, PathBuilder};

pub const ORDER: &str = r#"
{
    "id": "A-1",
    "customer": {
        "name": "Ada",
        "vip": true
    },
    "items": [
        {
            "sku": "x1",
            "qty": 2,
            "tags": ["new", "sale"]
        },
        {
            "sku": "y2",
            "qty": 1,
            "tags": []
        }
    ],
    "note": null
}
"#;

/// The object, customer, item and tag paths of the [`ORDER`] document.
pub fn order_paths() -> Vec<String> {
    let root = PathBuilder::new().add_object(None);
    let item = root.clone().add_array(Some("items")).add_object(None);
    vec![
        root.clone().build(),
        root.add_object(Some("customer")).build(),
        item.clone().build(),
        item.add_array(Some("tags")).build(),
    ]
}

/// Writes every callback it receives to a shared text transcript.
pub struct Transcript {
    path: String,
    out: Rc<RefCell<String>>,
}

impl Transcript {
    pub fn new(path: &str, out: &Rc<RefCell<String>>) -> Self {
        Self {
            path: path.to_string(),
            out: Rc::clone(out),
        }
    }
}

impl JsonHandler for Transcript {
    fn begin(&mut self) -> Result<(), HandlerError> {
        writeln!(self.out.borrow_mut(), "{} begin", self.path)?;
        Ok(())
    }

    fn end(&mut self) -> Result<(), HandlerError> {
        writeln!(self.out.borrow_mut(), "{} end", self.path)?;
        Ok(())
    }

    fn value(&mut self, name: Option<&str>, value: Option<&str>) -> Result<(), HandlerError> {
        let value = value.map_or_else(|| "null".to_string(), |v| format!("{v:?}"));
        writeln!(
            self.out.borrow_mut(),
            "{} {}={value}",
            self.path,
            name.unwrap_or("-")
        )?;
        Ok(())
    }
}
