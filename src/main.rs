use std::mem;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "xmledit",
    version,
    about = "Set an element's text or attribute in an xml file, in place"
)]
struct Args {
    /// XML file to edit (rewritten in place)
    file: PathBuf,
    /// Tag name of the element to edit (first match in document order)
    tag: Option<String>,
    /// Either `<text>` to set the element's text content,
    /// or `<attribute> <value>` to set one of its attributes
    #[arg(value_name = "VALUE")]
    values: Vec<String>,
}

/// What a single invocation does, decided once from the argument shape.
#[derive(Debug)]
enum Operation {
    Resave,
    SetText {
        tag: String,
        text: String,
    },
    SetAttribute {
        tag: String,
        name: String,
        value: String,
    },
}

impl Operation {
    fn from_args(tag: Option<String>, mut values: Vec<String>) -> Result<Operation> {
        let operation = match (tag, &mut values[..]) {
            (None, []) => Operation::Resave,
            (Some(tag), [text]) => Operation::SetText {
                tag,
                text: mem::take(text),
            },
            (Some(tag), [name, value]) => Operation::SetAttribute {
                tag,
                name: mem::take(name),
                value: mem::take(value),
            },
            _ => bail!("expected <file>, <file> <tag> <text>, or <file> <tag> <attribute> <value>"),
        };
        Ok(operation)
    }

    fn run(self, file: &Path) -> xmledit::Result<()> {
        match self {
            Operation::Resave => xmledit::resave(file),
            Operation::SetText { tag, text } => xmledit::set_element_text(file, &tag, &text),
            Operation::SetAttribute { tag, name, value } => {
                xmledit::set_element_attribute(file, &tag, &name, &value)
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let operation = Operation::from_args(args.tag, args.values)?;
    operation.run(&args.file)?;
    Ok(())
}
