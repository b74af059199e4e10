mod cursor_log;
