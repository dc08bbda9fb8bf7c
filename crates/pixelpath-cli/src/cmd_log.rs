use crate::cmd_replay::{SessionArgs, replay_session};
use anyhow::Result;
use pixelpath_studio::Snapshot;

pub async fn run(args: SessionArgs) -> Result<()> {
    let snapshot = replay_session(&args).await?;
    print!("{}", outline(&snapshot));
    Ok(())
}

/// One line per commit in display order, indented by depth. The current
/// commit is marked `*`, merge selections `+`.
fn outline(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    for entry in snapshot.render_order() {
        let commit = entry.commit;
        let marker = if snapshot.current_id.as_ref() == Some(&commit.id) {
            '*'
        } else if snapshot.selection.contains(commit.id.as_str()) {
            '+'
        } else {
            'o'
        };
        out.push_str(&"  ".repeat(entry.depth));
        out.push_str(&format!("{} {} {}", marker, commit.id.short(8), commit.title));
        if let Some(branch) = &commit.branch_name {
            out.push_str(&format!(" [{}]", branch));
        }
        if commit.is_merge() {
            let parents: Vec<&str> = commit.parent_ids.iter().map(|p| p.short(8)).collect();
            out.push_str(&format!(" (merge of {})", parents.join(", ")));
        }
        out.push('\n');
    }
    out
}
