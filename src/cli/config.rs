//! The `config` command

use super::CliContext;
use crate::error::BackupResult;

/// Show resolved paths and settings; with `init`, write the default files
pub fn handle_config(ctx: &CliContext, init: bool) -> BackupResult<()> {
    if init {
        if ctx.paths.is_initialized() {
            println!(
                "Settings already exist at {}; leaving them unchanged.",
                ctx.paths.settings_file().display()
            );
        } else {
            ctx.settings.save(&ctx.paths)?;
            println!("Wrote settings to {}", ctx.paths.settings_file().display());
        }

        if !ctx.paths.messages_file().exists() {
            ctx.messages.save(&ctx.paths)?;
            println!("Wrote messages to {}", ctx.paths.messages_file().display());
        }
        println!();
    }

    let settings = &ctx.settings;
    println!("server-backup configuration");
    println!("===========================");
    println!("Server root:    {}", ctx.server_root.display());
    println!("Tool directory: {}", ctx.paths.base_dir().display());
    println!("Settings file:  {}", ctx.paths.settings_file().display());
    println!("Output root:    {}", ctx.output_root().display());
    println!();
    println!("Settings:");
    println!("  backuppath:       {}", settings.backup_path);
    println!("  zipbackup:        {}", settings.zip_backup);
    println!("  backupworlds:     {}", settings.backup_worlds);
    println!("  backupplugins:    {}", settings.backup_plugins);
    println!("  backupeverything: {}", settings.backup_everything);
    println!("  skipplugins:      {}", settings.skip_plugins);
    println!("  dateformat:       {}", settings.date_format);
    println!("  maxbackups:       {}", settings.max_backups);
    println!("  enableautosave:   {}", settings.enable_autosave);

    Ok(())
}
