use formwork_core::Result;

/// Print the dependency edges of the resource graph
pub fn execute(dot: bool) -> Result<()> {
    let stack = crate::topology::storage_app()?;
    stack.validate()?;

    if dot {
        print!("{}", stack.graph().to_dot());
    } else {
        for (from, to, kind) in stack.graph().edges() {
            println!("{from} -> {to} [{kind}]");
        }
    }

    Ok(())
}
