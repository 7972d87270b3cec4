use lazy_static::lazy_static;
use std::sync::Mutex;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Language {
    En,
    Zh,
}

lazy_static! {
    static ref CURRENT_LANG: Mutex<Language> = Mutex::new(Language::En);
}

pub fn set_language(lang: Language) {
    *CURRENT_LANG.lock().unwrap_or_else(|e| e.into_inner()) = lang;
}

pub fn get_language() -> Language {
    *CURRENT_LANG.lock().unwrap_or_else(|e| e.into_inner())
}

pub fn t(key: &str) -> String {
    let val = match get_language() {
        Language::En => get_en(key),
        Language::Zh => get_zh(key),
    };
    if val.is_empty() {
        key.to_string()
    } else {
        val.to_string()
    }
}

fn get_zh(key: &str) -> &'static str {
    match key {
        "app_title" => "MP3 转 WAV",
        "open_file" => "打开文件...",
        "drag_drop" => "拖拽 MP3 文件到此处",
        "no_file" => "未选择文件",
        "bitrate" => "比特率",
        "sample_rate" => "采样率",
        "fade_in" => "淡入",
        "fade_out" => "淡出",
        "seconds" => " 秒",
        "filter" => "滤镜",
        "convert" => "转换为 .WAV",
        "converting" => "正在转换...",
        "please_wait" => "请等待转换完成",
        "select_file" => "请选择音频文件",
        "convert_fail" => "转换失败：",
        "saved" => "已保存：",
        "save_file" => "保存文件",
        "play" => "播放",
        "stop" => "停止",
        "ok" => "确定",
        "preset_none" => "无",
        "preset_loud" => "响亮 (-11 LUFS)",
        "preset_normal" => "标准 (-14 LUFS)",
        "preset_quiet" => "安静 (-19 LUFS)",
        "preset_brighter" => "更明亮",
        "preset_bassier" => "更多低音",
        "preset_volume_up" => "音量增大",
        "preset_volume_down" => "音量减小",
        "preset_dynaudnorm" => "动态标准化",
        _ => "",
    }
}

fn get_en(key: &str) -> &'static str {
    match key {
        "app_title" => "MP3 to WAV",
        "open_file" => "Open File...",
        "drag_drop" => "Drag & Drop an MP3 File Here",
        "no_file" => "No file selected",
        "bitrate" => "Bitrate",
        "sample_rate" => "Sample Rate",
        "fade_in" => "Fade In",
        "fade_out" => "Fade Out",
        "seconds" => " Seconds",
        "filter" => "Filter",
        "convert" => "Convert to .WAV",
        "converting" => "Converting...",
        "please_wait" => "Please wait for the conversion to finish",
        "select_file" => "Please select an audio file",
        "convert_fail" => "Conversion failed: ",
        "saved" => "Saved: ",
        "save_file" => "Save File",
        "play" => "Play",
        "stop" => "Stop",
        "ok" => "OK",
        "preset_none" => "None",
        "preset_loud" => "Loud (-11 LUFS)",
        "preset_normal" => "Normal (-14 LUFS)",
        "preset_quiet" => "Quiet (-19 LUFS)",
        "preset_brighter" => "Brighter",
        "preset_bassier" => "Bassier",
        "preset_volume_up" => "Volume Up",
        "preset_volume_down" => "Volume Down",
        "preset_dynaudnorm" => "Dynamic Normalize",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_key_echoes() {
        assert_eq!(get_en("no_such_key"), "");
        assert_eq!(t("no_such_key"), "no_such_key");
    }

    #[test]
    fn every_english_key_has_a_chinese_entry() {
        for key in ["convert", "converting", "please_wait", "select_file", "seconds", "preset_dynaudnorm"] {
            assert!(!get_en(key).is_empty());
            assert!(!get_zh(key).is_empty());
        }
    }
}
