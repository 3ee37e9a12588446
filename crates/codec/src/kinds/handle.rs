use octlink_primitives::{FunctionHandle, Value};

use crate::error::{Error, Result};
use crate::reader::Reader;
use crate::writer::Writer;

const ANONYMOUS: &str = "@<anonymous>";

/// Reads a handle. Location headers the engine adds for named functions
/// (`# octaveroot:`, `# path:`, `# subtype:`) are skipped.
pub(super) fn read(reader: &mut Reader<'_>, _tag: &str) -> Result<Value> {
	let mut line = reader.require_line("a function name")?;
	while line.starts_with("# ") {
		line = reader.require_line("a function name")?;
	}
	if line.trim() != ANONYMOUS {
		return Ok(Value::FunctionHandle(FunctionHandle::Named(line.trim().to_owned())));
	}

	let source = reader.require_line("anonymous function text")?.to_owned();
	let mut captured = Vec::new();
	if reader.peek_header("length") {
		let len: usize = reader.parsed_header("length")?;
		for _ in 0..len {
			captured.push(reader.read_named()?);
		}
	}
	Ok(Value::FunctionHandle(FunctionHandle::Anonymous { source, captured }))
}

pub(super) fn write(writer: &mut Writer<'_>, value: &Value) -> Result<()> {
	let Value::FunctionHandle(handle) = value else {
		return Err(Error::NoWriter(value.kind()));
	};
	writer.header("type", "function handle");
	match handle {
		FunctionHandle::Named(name) => writer.line(name),
		FunctionHandle::Anonymous { source, captured } => {
			writer.line(ANONYMOUS);
			writer.line(source);
			if !captured.is_empty() {
				writer.header("length", captured.len());
				for var in captured {
					writer.write_named(&var.name, &var.value)?;
				}
			}
		}
	}
	Ok(())
}
